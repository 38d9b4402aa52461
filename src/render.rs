use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// Background is always black, so a cell only carries its glyph and ink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::White,
};

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![BLANK; usize::from(w) * usize::from(h)],
        }
    }

    fn slot(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        let (x, y) = (u16::try_from(x).ok()?, u16::try_from(y).ok()?);
        if x >= self.w || y >= self.h {
            return None;
        }
        self.cells
            .get_mut(usize::from(y) * usize::from(self.w) + usize::from(x))
    }

    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        if x >= self.w || y >= self.h {
            return None;
        }
        self.cells
            .get(usize::from(y) * usize::from(self.w) + usize::from(x))
            .copied()
    }

    pub(crate) fn put(&mut self, x: i32, y: i32, ch: char, fg: Color) {
        if let Some(c) = self.slot(x, y) {
            *c = Cell { ch, fg };
        }
    }

    pub(crate) fn blank(&mut self) {
        self.cells.fill(BLANK);
    }
}

/// Raw-mode alternate screen that repaints only the cells that changed.
pub(crate) struct Terminal {
    out: io::Stdout,
    pub(crate) frame: CellBuffer,
    shown: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            SetBackgroundColor(Color::Black),
            Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            frame: CellBuffer::new(cols, rows),
            shown: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Reallocate both buffers when the window size changed.
    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (cols, rows) = terminal::size()?;
        if (cols, rows) == (self.frame.w, self.frame.h) {
            return Ok(false);
        }
        self.frame = CellBuffer::new(cols, rows);
        self.shown = CellBuffer::new(cols, rows);
        queue!(
            self.out,
            SetBackgroundColor(Color::Black),
            Clear(ClearType::All)
        )?;
        Ok(true)
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            SetBackgroundColor(Color::Black)
        )?;

        let w = usize::from(self.frame.w.max(1));
        let mut ink = None;
        // Next position the cursor sits at after the previous print.
        let mut cursor_at = None;

        for (i, (new, old)) in self.frame.cells.iter().zip(&self.shown.cells).enumerate() {
            if new == old {
                continue;
            }
            let pos = ((i % w) as u16, (i / w) as u16);
            if cursor_at != Some(pos) {
                queue!(self.out, cursor::MoveTo(pos.0, pos.1))?;
            }
            if ink != Some(new.fg) {
                queue!(self.out, SetForegroundColor(new.fg))?;
                ink = Some(new.fg);
            }
            queue!(self.out, Print(new.ch))?;
            cursor_at = Some((pos.0.saturating_add(1), pos.1));
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.shown.cells.copy_from_slice(&self.frame.cells);
        Ok(())
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = i32::from(x) + i as i32;
        if xx >= i32::from(buf.w) {
            break;
        }
        buf.put(xx, i32::from(y), ch, fg);
    }
}

pub(crate) fn bar(value: u8, width: usize) -> String {
    let fill = (usize::from(value.min(100)) * width + 50) / 100;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

pub(crate) fn draw_box(buf: &mut CellBuffer, title: &str, body: &str, fg: Color) {
    let w = buf.w;
    let h = buf.h;
    let bw = 48.min(w.saturating_sub(4));
    let bh = 12.min(h.saturating_sub(4));
    if bw < 4 || bh < 4 {
        return;
    }
    let x0 = (w - bw) / 2;
    let y0 = (h - bh) / 2;

    for y in y0..y0 + bh {
        for x in x0..x0 + bw {
            buf.put(i32::from(x), i32::from(y), ' ', fg);
        }
    }
    for x in x0..x0 + bw {
        buf.put(x as i32, y0 as i32, '─', fg);
        buf.put(x as i32, (y0 + bh - 1) as i32, '─', fg);
    }
    for y in y0..y0 + bh {
        buf.put(x0 as i32, y as i32, '│', fg);
        buf.put((x0 + bw - 1) as i32, y as i32, '│', fg);
    }
    buf.put(x0 as i32, y0 as i32, '┌', fg);
    buf.put((x0 + bw - 1) as i32, y0 as i32, '┐', fg);
    buf.put(x0 as i32, (y0 + bh - 1) as i32, '└', fg);
    buf.put((x0 + bw - 1) as i32, (y0 + bh - 1) as i32, '┘', fg);

    draw_text(buf, x0 + 2, y0 + 1, title, fg);
    let mut yy = y0 + 3;
    for line in body.lines() {
        if yy >= y0 + bh - 1 {
            break;
        }
        draw_text(buf, x0 + 2, yy, line, fg);
        yy += 1;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CatPose {
    Sit,
    Blink,
    Front,
    Side,
    Back,
    SideFlip,
    Dead,
}

impl CatPose {
    fn sprite(self) -> [&'static str; 5] {
        match self {
            CatPose::Sit => [
                "  /\\_/\\  ",
                " ( o.o ) ",
                "  > ^ <  ",
                " /     \\ ",
                "(_______)",
            ],
            CatPose::Blink => [
                "  /\\_/\\  ",
                " ( -.- ) ",
                "  > ^ <  ",
                " /     \\ ",
                "(_______)",
            ],
            CatPose::Front => [
                "  /\\_/\\  ",
                " ( O.O ) ",
                "  > o <  ",
                " /     \\ ",
                "(_______)",
            ],
            CatPose::Side => [
                "   /\\_   ",
                "  ( o \\  ",
                "   >  )  ",
                "  /    \\ ",
                " (______)",
            ],
            CatPose::Back => [
                "  /\\_/\\  ",
                " (     ) ",
                "  (   )  ",
                " /     \\ ",
                "(___~___)",
            ],
            CatPose::SideFlip => [
                "   _/\\   ",
                "  / o )  ",
                "  (  <   ",
                " /    \\  ",
                "(______) ",
            ],
            CatPose::Dead => [
                "  /\\_/\\  ",
                " ( x.x ) ",
                "  > _ <  ",
                " /     \\ ",
                "(_______)",
            ],
        }
    }
}

pub(crate) fn draw_cat(buf: &mut CellBuffer, pose: CatPose, cx: i32, cy: i32, fg: Color) {
    let sprite = pose.sprite();
    let x0 = cx - 4;
    let y0 = cy - 2;
    for (dy, line) in sprite.iter().enumerate() {
        for (dx, ch) in line.chars().enumerate() {
            buf.put(x0 + dx as i32, y0 + dy as i32, ch, fg);
        }
    }
}
