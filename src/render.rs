//! Terminal presentation: frames are painted into an RGB pixel buffer that is
//! flushed with half-block characters (two pixels per terminal cell).

use std::io::{self, Write};

use crossterm::{
    cursor, execute, queue,
    style::{self, Color as CColor},
    terminal,
};

use crate::config::{SKY_HEIGHT, WORLD_WIDTH};
use crate::frame::{Frame, PipeView, Renderer};
use crate::state::GameState;

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

impl From<Rgb> for CColor {
    fn from(c: Rgb) -> Self {
        CColor::Rgb {
            r: c.0,
            g: c.1,
            b: c.2,
        }
    }
}

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PANEL: Rgb = Rgb(220, 195, 120);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_BODY: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const BUTTON: Rgb = Rgb(232, 97, 1);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

/// Gradient stops across a pipe's width, on a 0..=256 scale.
const PIPE_STOPS: [(u16, Rgb); 5] = [
    (0, PIPE_L),
    (64, PIPE_M),
    (100, PIPE_HI),
    (160, PIPE_R),
    (256, PIPE_L),
];

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x.clamp(0, total_w - 1) * 256 / (total_w - 1)) as u16;
    for pair in PIPE_STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            return Rgb::lerp(c0, c1, (t - t0) * 256 / (t1 - t0));
        }
    }
    PIPE_L
}

// ── Pixel buffer ────────────────────────────────────────────────────────────

pub struct PixelBuf {
    w: usize,
    /// Pixel rows; always twice the terminal rows.
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w * h, SKY_TOP);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.set(xx, yy, c);
            }
        }
    }

    fn dim_all(&mut self) {
        for c in &mut self.px {
            *c = c.dim();
        }
    }

    /// Writes the buffer as `▀` cells, re-emitting colors only on change.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);
                if bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.into()))?;
                    bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                    continue;
                }
                if fg != Some(top) {
                    queue!(out, style::SetForegroundColor(top.into()))?;
                    fg = Some(top);
                }
                queue!(out, style::Print('\u{2580}'))?;
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── Digits ──────────────────────────────────────────────────────────────────

/// 3x5 glyphs, one 3-bit mask per row (MSB is the left column).
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b011, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

fn draw_digit(buf: &mut PixelBuf, x: i32, y: i32, d: usize, fg: Rgb) {
    for (row, &mask) in DIGITS[d].iter().enumerate() {
        for col in 0..3 {
            if (mask >> (2 - col)) & 1 == 1 {
                let px = x + col;
                let py = y + row as i32;
                buf.set(px + 1, py + 1, SHADOW);
                buf.set(px, py, fg);
            }
        }
    }
}

/// Centered on `cx`; 3px per digit plus 1px spacing.
fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    let s = n.to_string();
    let total_w = s.len() as i32 * 4 - 1;
    let start_x = cx - total_w / 2;
    for (i, ch) in s.bytes().enumerate() {
        draw_digit(buf, start_x + i as i32 * 4, y, (ch - b'0') as usize, fg);
    }
}

// ── World to pixels ─────────────────────────────────────────────────────────

/// Maps world units onto the pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub sx: f64,
    pub sy: f64,
    pub sky_h: i32,
    pub ground_h: i32,
    /// Sprite detail scale, 1.0 at 48 pixel rows.
    pub scale: f64,
}

impl Projection {
    pub fn new(pw: usize, ph: usize) -> Self {
        let scale = ph as f64 / 48.0;
        let ground_h = ((8.0 * scale).max(6.0) as i32).min(ph as i32 / 3);
        let sky_h = ph as i32 - ground_h;
        Self {
            sx: pw as f64 / WORLD_WIDTH,
            sy: sky_h.max(1) as f64 / SKY_HEIGHT,
            sky_h,
            ground_h,
            scale,
        }
    }

    pub fn x(&self, world_x: f64) -> i32 {
        (world_x * self.sx).round() as i32
    }

    pub fn y(&self, world_y: f64) -> i32 {
        (world_y * self.sy).round() as i32
    }

    pub fn w(&self, world_w: f64) -> i32 {
        ((world_w * self.sx).round() as i32).max(1)
    }

    pub fn h(&self, world_h: f64) -> i32 {
        ((world_h * self.sy).round() as i32).max(1)
    }
}

// ── Renderer ────────────────────────────────────────────────────────────────

pub struct TermRenderer<W: Write> {
    out: W,
    buf: PixelBuf,
    proj: Projection,
    ground_x: f64,
    frame_no: u64,
    /// Score of the most recent run, shown on the game-over panel.
    last_score: u32,
}

impl<W: Write> TermRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        let (pw, ph) = (cols as usize, rows as usize * 2);
        Self {
            out,
            buf: PixelBuf::new(pw, ph),
            proj: Projection::new(pw, ph),
            ground_x: 0.0,
            frame_no: 0,
            last_score: 0,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (pw, ph) = (cols as usize, rows as usize * 2);
        self.buf.resize(pw, ph);
        self.proj = Projection::new(pw, ph);
        log::debug!("resized to {}x{} pixels", pw, ph);
    }

    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )
    }

    pub fn exit(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    }

    pub fn buffer(&self) -> &PixelBuf {
        &self.buf
    }

    pub fn projection(&self) -> Projection {
        self.proj
    }

    /// Paints `frame` into the pixel buffer without touching the terminal.
    pub fn paint(&mut self, frame: &Frame) {
        self.frame_no += 1;
        if frame.state == GameState::Running {
            self.ground_x += 1.0;
            self.last_score = frame.score;
        }
        if self.buf.width() == 0 || self.buf.height() < 2 {
            return;
        }

        self.draw_sky();
        self.draw_hills();
        for pipe in &frame.pipes {
            self.draw_pipe(pipe);
        }
        self.draw_ground();
        self.draw_bird(frame);

        match frame.state {
            GameState::Idle => self.draw_start_button(self.proj.sky_h / 2),
            GameState::Running => {
                let cx = self.buf.width() as i32 / 2;
                draw_number(&mut self.buf, cx, 4, frame.score, WHITE);
            }
            GameState::Dead => self.draw_game_over(frame.high_score),
        }
    }

    fn draw_sky(&mut self) {
        let sky_h = self.proj.sky_h.max(1);
        for y in 0..sky_h {
            let c = Rgb::lerp(SKY_TOP, SKY_BOT, (y * 256 / sky_h) as u16);
            self.buf.fill_rect(0, y, self.buf.width() as i32, 1, c);
        }
    }

    fn draw_hills(&mut self) {
        let base = self.proj.sky_h;
        let s = self.proj.scale;
        let layers = [(HILL_FAR, 0.2, 0.04, 6.0, 1.7, 4.0), (HILL_NEAR, 0.4, 0.06, 4.0, 2.3, 2.0)];
        for (color, parallax, freq, amp, harmonic, lift) in layers {
            for x in 0..self.buf.width() as i32 {
                let fx = (x as f64 + self.ground_x * parallax) * freq;
                let h = (fx.sin() * amp + (fx * harmonic).sin() * amp / 2.0) * s;
                let top = base - h as i32 - (lift * s) as i32;
                self.buf.fill_rect(x, top, 1, base - top, color);
            }
        }
    }

    fn draw_ground(&mut self) {
        let gy = self.proj.sky_h;
        let w = self.buf.width() as i32;
        for x in 0..w {
            let alt = ((x as f64 + self.ground_x) as i32 / 3) % 2 == 0;
            self.buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
            self.buf.set(x, gy + 1, GRASS);
        }
        for y in (gy + 2)..self.buf.height() as i32 {
            for x in 0..w {
                let stripe = ((x as f64 + self.ground_x * 0.8) as i32 + (y - gy) * 2) % 12 < 6;
                self.buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
            }
        }
    }

    fn draw_pipe(&mut self, pipe: &PipeView) {
        let p = self.proj;
        let px = p.x(pipe.x);
        let pw = p.w(pipe.width);
        let gap_top = p.y(pipe.gap_top);
        let gap_bot = p.y(pipe.gap_top + pipe.gap_height);
        let cap_extra = (p.scale).max(1.0) as i32;
        let cap_h = (2.0 * p.scale).max(2.0) as i32;
        let cap_w = pw + cap_extra * 2;

        for x in 0..pw {
            let c = pipe_shade(x, pw);
            self.buf.fill_rect(px + x, 0, 1, gap_top - cap_h, c);
            self.buf
                .fill_rect(px + x, gap_bot + cap_h, 1, p.sky_h - gap_bot - cap_h, c);
        }
        for x in 0..cap_w {
            let c = pipe_shade(x, cap_w);
            let cx = px - cap_extra + x;
            self.buf.fill_rect(cx, gap_top - cap_h, 1, cap_h, c);
            self.buf.fill_rect(cx, gap_bot, 1, cap_h, c);
            self.buf.set(cx, gap_top - cap_h, CAP_DARK);
            self.buf.set(cx, gap_top - 1, CAP_DARK);
            self.buf.set(cx, gap_bot, CAP_DARK);
            self.buf.set(cx, gap_bot + cap_h - 1, CAP_DARK);
        }
    }

    fn draw_bird(&mut self, frame: &Frame) {
        let p = self.proj;
        let x0 = p.x(frame.bird_left_x);
        let w = p.w(frame.bird_right_x - frame.bird_left_x).max(3);
        let y0 = p.y(frame.bird_y);
        let h = p.h(frame.bird_height).max(2);
        let tilt = (frame.bird_dy / 2.0).clamp(-1.0, 1.0) as i32;

        self.buf.fill_rect(x0, y0, w, h, BIRD_BODY);
        self.buf.fill_rect(x0 + 1, y0, w - 2, 1, BIRD_HI);

        let wing_up = frame.state == GameState::Running && self.frame_no % 8 < 4;
        let wing_y = y0 + h / 2 + if wing_up { -1 } else { 0 } + tilt;
        self.buf
            .fill_rect(x0 + 1, wing_y, (w / 3).max(1), (h / 3).max(1), BIRD_WING);

        let eye = (w / 5).max(1);
        let ex = x0 + w - eye - 1;
        let ey = y0 + (h / 5).max(1) - 1;
        self.buf.fill_rect(ex, ey, eye, eye, BIRD_EYE);
        self.buf.set(ex + eye - 1, ey + eye - 1, BIRD_PUPIL);

        let beak_w = (w / 4).max(1);
        let beak_h = (h / 4).max(1);
        self.buf
            .fill_rect(x0 + w, y0 + h / 2 + tilt, beak_w, beak_h, BIRD_BEAK);

        let tail = (w / 6).max(1);
        self.buf
            .fill_rect(x0 - tail, y0 + h / 2 - 1 + tilt, tail, 2, BIRD_WING);
    }

    fn draw_start_button(&mut self, cy: i32) {
        let s = self.proj.scale;
        let bw = (14.0 * s).max(9.0) as i32;
        let bh = (6.0 * s).max(5.0) as i32;
        let bx = self.buf.width() as i32 / 2 - bw / 2;
        let by = cy - bh / 2;
        self.buf.fill_rect(bx - 1, by - 1, bw + 2, bh + 2, SHADOW);
        self.buf.fill_rect(bx, by, bw, bh, BUTTON);
        // Play triangle.
        let tri_h = (bh - 2).max(1);
        let tx = bx + bw / 2 - tri_h / 4;
        for row in 0..tri_h {
            let half = row.min(tri_h - 1 - row);
            self.buf.fill_rect(tx, by + 1 + row, half + 1, 1, WHITE);
        }
    }

    fn draw_game_over(&mut self, high_score: u32) {
        self.buf.dim_all();

        let s = self.proj.scale;
        let cx = self.buf.width() as i32 / 2;
        let cy = self.proj.sky_h / 2;
        let panel_w = (40.0 * s).max(30.0) as i32;
        let panel_h = (20.0 * s).max(16.0) as i32;
        let px = cx - panel_w / 2;
        let py = cy - panel_h / 2;
        self.buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
        self.buf.fill_rect(px, py, panel_w, panel_h, DIRT);
        self.buf
            .fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL);

        draw_number(&mut self.buf, cx, py + 3, self.last_score, WHITE);
        draw_number(&mut self.buf, cx, py + 10, high_score, BIRD_BODY);

        self.draw_start_button(py + panel_h + (8.0 * s).max(5.0) as i32);
    }
}

impl<W: Write> Renderer for TermRenderer<W> {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        self.paint(frame);
        self.buf.render(&mut self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BIRD_HEIGHT, BIRD_LEFT_X, BIRD_RIGHT_X, GROUND_Y};

    fn frame(state: GameState, pipes: Vec<PipeView>) -> Frame {
        Frame {
            state,
            bird_y: 228.0,
            bird_dy: 0.0,
            bird_left_x: BIRD_LEFT_X,
            bird_right_x: BIRD_RIGHT_X,
            bird_height: BIRD_HEIGHT,
            pipes,
            score: 3,
            high_score: 7,
            score_text: "Score: 3".into(),
            high_score_text: "Highscore: 7".into(),
        }
    }

    #[test]
    fn projection_spans_the_buffer() {
        let p = Projection::new(80, 48);
        assert_eq!(p.x(WORLD_WIDTH), 80);
        assert_eq!(p.sky_h + p.ground_h, 48);
        assert_eq!(p.y(SKY_HEIGHT), p.sky_h);
        assert!(p.y(GROUND_Y) < p.sky_h);
    }

    #[test]
    fn pipe_shade_covers_edges() {
        assert_eq!(pipe_shade(0, 10), PIPE_L);
        assert_eq!(pipe_shade(9, 10), PIPE_L);
        assert_eq!(pipe_shade(0, 1), PIPE_M);
    }

    #[test]
    fn pipe_is_painted_where_projected() {
        let mut r = TermRenderer::new(Vec::new(), 80, 24);
        let pipe = PipeView {
            x: 200.0,
            width: 52.0,
            gap_top: 200.0,
            gap_height: 140.0,
        };
        r.paint(&frame(GameState::Running, vec![pipe]));
        let p = r.projection();
        let pw = p.w(52.0);
        let col = (p.x(200.0) + pw / 2) as usize;
        assert_eq!(r.buffer().get(col, 1), pipe_shade(pw / 2, pw));

        let in_gap = p.y(270.0);
        let sky = Rgb::lerp(SKY_TOP, SKY_BOT, (in_gap * 256 / p.sky_h) as u16);
        assert_eq!(r.buffer().get(col, in_gap as usize), sky);
    }

    #[test]
    fn present_writes_escape_sequences() {
        let mut r = TermRenderer::new(Vec::new(), 20, 10);
        r.present(&frame(GameState::Idle, Vec::new())).unwrap();
        assert!(!r.out.is_empty());
        assert!(r.out.starts_with(b"\x1b["));
    }

    #[test]
    fn empty_buffer_is_harmless() {
        let mut r = TermRenderer::new(Vec::new(), 0, 0);
        r.present(&frame(GameState::Dead, Vec::new())).unwrap();
    }

    #[test]
    fn digits_render_with_shadow() {
        let mut buf = PixelBuf::new(10, 10);
        draw_number(&mut buf, 5, 0, 1, WHITE);
        // '1' has its top pixel in the middle column.
        assert_eq!(buf.get(5, 0), WHITE);
    }
}
