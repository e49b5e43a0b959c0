/// Terminal front-end: raw-mode event loop driving the wireframe viewer
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags, MouseButton,
        MouseEvent, MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use wireview_core::{InputEvent, MoveDirection, Viewer};

pub mod renderer;

pub use renderer::WireframeRenderer;

/// Rough width of one terminal cell in pixels; mouse-drag deltas are
/// scaled by this so the look sensitivity matches a pixel-based host.
const CELL_PIXELS: f32 = 8.0;
/// Look delta sent per arrow-key press, in pixels.
const ARROW_LOOK_PIXELS: f32 = 40.0;

/// Terminal application: owns the viewer state and the rasterizer and
/// translates crossterm events into viewer input events.
pub struct TerminalApp {
    viewer: Viewer,
    renderer: WireframeRenderer,
    running: bool,
    start: Instant,
    last_tick: Instant,
    fps_window: Instant,
    frame_count: u32,
    fps: f32,
    /// Last mouse cell while dragging, for delta computation.
    drag_anchor: Option<(u16, u16)>,
    /// Terminals without key-release reporting get tap-style movement:
    /// each press is released again after the following update.
    key_release_events: bool,
    tapped: Vec<MoveDirection>,
}

impl TerminalApp {
    pub fn new(mut viewer: Viewer) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        viewer.scene.camera.width = width as u32;
        viewer.scene.camera.height = height as u32;

        Ok(Self {
            viewer,
            renderer: WireframeRenderer::new(width as usize, height as usize),
            running: true,
            start: Instant::now(),
            last_tick: Instant::now(),
            fps_window: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            drag_anchor: None,
            key_release_events: terminal::supports_keyboard_enhancement().unwrap_or(false),
            tapped: Vec::new(),
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;
        if self.key_release_events {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }

        let result = self.main_loop();

        if self.key_release_events {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        execute!(
            stdout(),
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                let ev = event::read()?;
                self.handle_event(ev);
            }

            let dt_ms = self.last_tick.elapsed().as_secs_f32() * 1000.0;
            self.last_tick = Instant::now();
            let now_ms = self.start.elapsed().as_millis() as u64;
            self.viewer.update(dt_ms, now_ms);

            // Tap-style release for terminals without key-up events
            for direction in self.tapped.drain(..) {
                self.viewer
                    .handle_input(InputEvent::Move { direction, pressed: false });
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.fps_window).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.fps_window).as_secs_f32();
                self.frame_count = 0;
                self.fps_window = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, ev: Event) {
        match ev {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.renderer.resize(width as usize, height as usize);
                self.viewer.scene.camera.width = width as u32;
                self.viewer.scene.camera.height = height as u32;
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let pressed = key.kind != KeyEventKind::Release;
        match key.code {
            KeyCode::Char('q') => {
                self.running = false;
            }
            KeyCode::Esc => {
                // Leave mouse-look, matching the source's relative-mode exit
                self.drag_anchor = None;
            }
            KeyCode::Char('w') => self.movement(MoveDirection::Forward, pressed),
            KeyCode::Char('s') => self.movement(MoveDirection::Backward, pressed),
            KeyCode::Char('a') => self.movement(MoveDirection::Left, pressed),
            KeyCode::Char('d') => self.movement(MoveDirection::Right, pressed),
            KeyCode::Char(' ') => self.movement(MoveDirection::Up, pressed),
            KeyCode::Char('c') => self.movement(MoveDirection::Down, pressed),
            KeyCode::Left if pressed => self.look(-ARROW_LOOK_PIXELS, 0.0),
            KeyCode::Right if pressed => self.look(ARROW_LOOK_PIXELS, 0.0),
            KeyCode::Up if pressed => self.look(0.0, -ARROW_LOOK_PIXELS),
            KeyCode::Down if pressed => self.look(0.0, ARROW_LOOK_PIXELS),
            _ => {}
        }
    }

    fn movement(&mut self, direction: MoveDirection, pressed: bool) {
        self.viewer
            .handle_input(InputEvent::Move { direction, pressed });
        if pressed && !self.key_release_events {
            self.tapped.push(direction);
        }
    }

    fn look(&mut self, dx: f32, dy: f32) {
        self.viewer.handle_input(InputEvent::Look { dx, dy });
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.viewer.handle_input(InputEvent::PointerPressed);
                self.drag_anchor = Some((mouse.column, mouse.row));
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((col, row)) = self.drag_anchor {
                    let dx = (mouse.column as f32 - col as f32) * CELL_PIXELS;
                    let dy = (mouse.row as f32 - row as f32) * CELL_PIXELS;
                    self.look(dx, dy);
                }
                self.drag_anchor = Some((mouse.column, mouse.row));
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_anchor = None;
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        for point in self.viewer.scene.projected_points().iter().flatten() {
            self.renderer.draw_point(*point);
        }
        for (a, b) in self.viewer.scene.visible_edges() {
            self.renderer.draw_segment(a, b);
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "wireview | FPS: {:.1} | {} vertices, {} edges | WASD move, Space/C up/down, drag or arrows look, Q quit",
                self.fps,
                self.viewer.scene.vertices().len(),
                self.viewer.scene.edges().len()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
