/// ASCII line rasterizer for terminal wireframe output
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use wireview_core::ScreenPoint;

/// Character buffer the wireframe is rasterized into, one cell per
/// terminal character. There is no depth buffer: wireframes draw every
/// visible edge, occluded or not.
pub struct WireframeRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
}

impl WireframeRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            char_buffer: vec![' '; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.char_buffer = vec![' '; width * height];
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
    }

    /// Plot a single projected vertex.
    pub fn draw_point(&mut self, p: ScreenPoint) {
        let x = p.x.round() as i64;
        let y = p.y.round() as i64;
        self.plot(x, y, '+');
    }

    /// Rasterize one edge between two projected endpoints. The segment
    /// is clipped to the screen rectangle before stepping so that
    /// near-plane blowups (huge off-screen coordinates) stay cheap.
    pub fn draw_segment(&mut self, a: ScreenPoint, b: ScreenPoint) {
        let Some(((x0, y0), (x1, y1))) = self.clip_segment(a, b) else {
            return;
        };

        let dx = x1 - x0;
        let dy = y1 - y0;
        let glyph = slope_glyph(dx, dy);

        let steps = dx.abs().max(dy.abs());
        if steps == 0 {
            self.plot(x0, y0, glyph);
            return;
        }
        for i in 0..=steps {
            let x = x0 + dx * i / steps;
            let y = y0 + dy * i / steps;
            self.plot(x, y, glyph);
        }
    }

    fn plot(&mut self, x: i64, y: i64, glyph: char) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.char_buffer[y as usize * self.width + x as usize] = glyph;
    }

    /// Liang-Barsky clip against the screen rectangle, returning cell
    /// coordinates, or `None` when the segment misses the screen.
    fn clip_segment(&self, a: ScreenPoint, b: ScreenPoint) -> Option<((i64, i64), (i64, i64))> {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let (mut t0, mut t1) = (0.0f32, 1.0f32);
        let x_max = self.width as f32 - 1.0;
        let y_max = self.height as f32 - 1.0;

        for (p, q) in [
            (-dx, a.x),
            (dx, x_max - a.x),
            (-dy, a.y),
            (dy, y_max - a.y),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        let start = (
            (a.x + t0 * dx).round() as i64,
            (a.y + t0 * dy).round() as i64,
        );
        let end = (
            (a.x + t1 * dx).round() as i64,
            (a.y + t1 * dy).round() as i64,
        );
        Some((start, end))
    }

    /// Queue the buffer contents as styled terminal output.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];
                let color = match c {
                    '+' => Color::Yellow,
                    '-' | '|' => Color::Grey,
                    _ => Color::White,
                };
                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print('\n'))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    #[cfg(test)]
    fn cell(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }
}

/// Pick a line glyph from the dominant direction. Screen y grows
/// downward, so a positive dy per positive dx renders as '\'.
fn slope_glyph(dx: i64, dy: i64) -> char {
    if dx.abs() > 2 * dy.abs() {
        '-'
    } else if dy.abs() > 2 * dx.abs() {
        '|'
    } else if (dx >= 0) == (dy >= 0) {
        '\\'
    } else {
        '/'
    }
}
