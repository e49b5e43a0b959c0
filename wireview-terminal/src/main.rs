/// Wireview Terminal - interactive wireframe viewer
///
/// Usage: wireview-terminal [mesh.obj]
///
/// Controls:
///   - W/A/S/D: move, Space/C: up/down (momentum-based)
///   - Mouse drag or arrow keys: look around
///   - Q: quit, Esc: release mouse look
///
/// With no argument (or when the given file fails to load) a built-in
/// unit cube is shown. After 10 seconds without input the camera orbits
/// the scene automatically.

use std::env;
use std::io;
use std::path::Path;
use wireview_core::{obj, Viewer};
use wireview_terminal::TerminalApp;

fn main() -> io::Result<()> {
    colog::init();

    let mut viewer = Viewer::new();

    let args: Vec<String> = env::args().collect();
    let loaded = match args.get(1) {
        Some(path) => match viewer.load(Path::new(path)) {
            Ok(()) => {
                log::info!(
                    "loaded {path}: {} vertices, {} edges",
                    viewer.scene.vertices().len(),
                    viewer.scene.edges().len()
                );
                true
            }
            Err(err) => {
                log::error!("failed to load {path}: {err}");
                false
            }
        },
        None => false,
    };
    if !loaded {
        log::info!("showing built-in cube scene");
        viewer
            .load_str(obj::UNIT_CUBE_OBJ)
            .expect("built-in cube mesh must parse");
    }

    let mut app = TerminalApp::new(viewer)?;
    app.run()
}
