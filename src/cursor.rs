use crate::buffer::Buffer;

/// 文書上の位置 (行, 生の列)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// カーソルとスクロール位置
///
/// `cy == buffer.len()` は「最終行の次」を表し、そこでの入力は行を追加する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub cx: usize,
    pub cy: usize,
    /// 表示上の列。`scroll` のたびに `cx` から計算し直す
    pub rx: usize,
    pub row_offset: usize,
    pub col_offset: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        Position::new(self.cy, self.cx)
    }

    pub fn set_position(&mut self, pos: Position) {
        self.cy = pos.row;
        self.cx = pos.col;
    }

    /// カーソルが見えるように最小限スクロールする
    pub fn scroll(&mut self, buffer: &Buffer, screen_rows: usize, screen_cols: usize) {
        self.rx = buffer.row(self.cy).map_or(0, |row| row.cx_to_rx(self.cx));

        if self.cy < self.row_offset {
            self.row_offset = self.cy;
        }
        if self.cy >= self.row_offset + screen_rows {
            self.row_offset = (self.cy + 1).saturating_sub(screen_rows);
        }
        if self.rx < self.col_offset {
            self.col_offset = self.rx;
        }
        if self.rx >= self.col_offset + screen_cols {
            self.col_offset = (self.rx + 1).saturating_sub(screen_cols);
        }
    }

    pub fn move_left(&mut self, buffer: &Buffer) {
        if self.cx > 0 {
            self.cx -= 1;
        } else if self.cy > 0 {
            // 行頭では前の行の末尾へ
            self.cy -= 1;
            self.cx = buffer.row(self.cy).map_or(0, |r| r.len());
        }
    }

    pub fn move_right(&mut self, buffer: &Buffer) {
        if let Some(row) = buffer.row(self.cy) {
            if self.cx < row.len() {
                self.cx += 1;
            } else {
                self.cy += 1;
                self.cx = 0;
            }
        }
    }

    pub fn move_up(&mut self, buffer: &Buffer) {
        self.cy = self.cy.saturating_sub(1);
        self.snap_to_row(buffer);
    }

    pub fn move_down(&mut self, buffer: &Buffer) {
        if self.cy < buffer.len() {
            self.cy += 1;
        }
        self.snap_to_row(buffer);
    }

    pub fn move_home(&mut self) {
        self.cx = 0;
    }

    pub fn move_end(&mut self, buffer: &Buffer) {
        if let Some(row) = buffer.row(self.cy) {
            self.cx = row.len();
        }
    }

    /// 画面の先頭行へ移動してから 1 画面分上へ
    pub fn page_up(&mut self, buffer: &Buffer, screen_rows: usize) {
        self.cy = self.row_offset;
        for _ in 0..screen_rows {
            self.move_up(buffer);
        }
    }

    /// 画面の最終行へ移動してから 1 画面分下へ
    pub fn page_down(&mut self, buffer: &Buffer, screen_rows: usize) {
        self.cy = (self.row_offset + screen_rows)
            .saturating_sub(1)
            .min(buffer.len());
        for _ in 0..screen_rows {
            self.move_down(buffer);
        }
    }

    fn snap_to_row(&mut self, buffer: &Buffer) {
        let len = buffer.row(self.cy).map_or(0, |r| r.len());
        self.cx = self.cx.min(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(lines: &[&str]) -> Buffer {
        Buffer::from_lines(lines.iter().map(|s| s.as_bytes().to_vec()).collect(), None)
    }

    #[test]
    fn test_scroll_down_keeps_cursor_visible() {
        let b = buffer(&["x"; 30]);
        let mut c = Cursor::new();
        c.cy = 25;
        c.scroll(&b, 10, 80);
        assert_eq!(c.row_offset, 16);

        c.cy = 3;
        c.scroll(&b, 10, 80);
        assert_eq!(c.row_offset, 3);
    }

    #[test]
    fn test_scroll_is_minimal() {
        let b = buffer(&["x"; 30]);
        let mut c = Cursor::new();
        c.row_offset = 5;
        c.cy = 10;
        c.scroll(&b, 10, 80);
        assert_eq!(c.row_offset, 5);
    }

    #[test]
    fn test_scroll_horizontal_uses_render_column() {
        let b = buffer(&["\t\tabc"]);
        let mut c = Cursor::new();
        c.cx = 2;
        c.scroll(&b, 10, 10);
        assert_eq!(c.rx, 16);
        assert_eq!(c.col_offset, 7);

        c.cx = 0;
        c.scroll(&b, 10, 10);
        assert_eq!(c.col_offset, 0);
    }

    #[test]
    fn test_rx_is_zero_past_last_row() {
        let b = buffer(&["abc"]);
        let mut c = Cursor::new();
        c.cy = 1;
        c.cx = 0;
        c.scroll(&b, 10, 10);
        assert_eq!(c.rx, 0);
    }

    #[test]
    fn test_move_left_wraps_to_previous_line() {
        let b = buffer(&["abc", "de"]);
        let mut c = Cursor::new();
        c.cy = 1;
        c.move_left(&b);
        assert_eq!(c.position(), Position::new(0, 3));
    }

    #[test]
    fn test_move_right_wraps_to_next_line() {
        let b = buffer(&["ab", "cd"]);
        let mut c = Cursor::new();
        c.cx = 2;
        c.move_right(&b);
        assert_eq!(c.position(), Position::new(1, 0));
    }

    #[test]
    fn test_vertical_move_snaps_column() {
        let b = buffer(&["long line", "ab"]);
        let mut c = Cursor::new();
        c.cx = 8;
        c.move_down(&b);
        assert_eq!(c.position(), Position::new(1, 2));
        c.move_down(&b);
        assert_eq!(c.position(), Position::new(2, 0));
        c.move_down(&b);
        assert_eq!(c.cy, 2);
    }

    #[test]
    fn test_home_end() {
        let b = buffer(&["hello"]);
        let mut c = Cursor::new();
        c.move_end(&b);
        assert_eq!(c.cx, 5);
        c.move_home();
        assert_eq!(c.cx, 0);
    }

    #[test]
    fn test_page_down_and_up() {
        let b = buffer(&["x"; 50]);
        let mut c = Cursor::new();
        c.page_down(&b, 10);
        assert_eq!(c.cy, 19);
        c.scroll(&b, 10, 80);
        c.page_up(&b, 10);
        assert_eq!(c.cy, 0);
    }

    #[test]
    fn test_page_down_stops_past_last_row() {
        let b = buffer(&["x"; 5]);
        let mut c = Cursor::new();
        c.page_down(&b, 10);
        assert_eq!(c.cy, 5);
    }
}
