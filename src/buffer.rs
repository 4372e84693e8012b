use crate::cursor::Position;
use crate::highlight;
use crate::row::Row;
use crate::syntax::Syntax;

/// 行の並びと、その編集操作
///
/// 行を書き換える操作はすべて、戻る前に表示用の列と強調表示を計算し直す。
pub struct Buffer {
    rows: Vec<Row>,
    /// 最後の読み込み/保存以降の変更回数
    dirty: usize,
    syntax: Option<&'static Syntax>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            dirty: 0,
            syntax: None,
        }
    }

    /// 読み込んだ行からバッファを作る。変更回数は 0 のまま
    pub fn from_lines(lines: Vec<Vec<u8>>, syntax: Option<&'static Syntax>) -> Self {
        let rows = lines
            .into_iter()
            .enumerate()
            .map(|(index, line)| Row::new(index, line))
            .collect();
        let mut buffer = Self {
            rows,
            dirty: 0,
            syntax: None,
        };
        buffer.set_syntax(syntax);
        buffer
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn dirty(&self) -> usize {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    pub fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    pub fn syntax(&self) -> Option<&'static Syntax> {
        self.syntax
    }

    /// プロファイルを差し替え、全行を計算し直す
    pub fn set_syntax(&mut self, syntax: Option<&'static Syntax>) {
        self.syntax = syntax;
        for at in 0..self.rows.len() {
            highlight::update_syntax(&mut self.rows, at, self.syntax);
        }
    }

    /// `at` が範囲外 (`at > len`) の場合は何もしない
    pub fn insert_row(&mut self, at: usize, chars: Vec<u8>) {
        if at > self.rows.len() {
            return;
        }
        // 後続の行はこの状態から始まるものとして計算済み
        let prev_open = at > 0 && self.rows[at - 1].open_comment();

        self.rows.insert(at, Row::new(at, chars));
        self.reindex_from(at + 1);
        highlight::update_syntax(&mut self.rows, at, self.syntax);
        if self.rows[at].open_comment() != prev_open {
            highlight::update_syntax(&mut self.rows, at + 1, self.syntax);
        }
        self.dirty += 1;
    }

    pub fn delete_row(&mut self, at: usize) -> Option<Row> {
        if at >= self.rows.len() {
            return None;
        }
        let removed = self.rows.remove(at);
        self.reindex_from(at);
        // 詰めてきた行の先頭状態は新しい前の行に依存する
        highlight::update_syntax(&mut self.rows, at, self.syntax);
        self.dirty += 1;
        Some(removed)
    }

    /// `pos` に文字を挿入し、挿入後のカーソル位置を返す
    ///
    /// `pos.row == len()` (最終行の次) の場合は空行を追加してから挿入する。
    pub fn insert_char(&mut self, pos: Position, c: u8) -> Position {
        if pos.row == self.rows.len() {
            self.insert_row(self.rows.len(), Vec::new());
        }
        let Some(row) = self.rows.get_mut(pos.row) else {
            return pos;
        };
        row.insert_char(pos.col, c);
        highlight::update_syntax(&mut self.rows, pos.row, self.syntax);
        self.dirty += 1;
        Position::new(pos.row, pos.col + 1)
    }

    /// `pos` の直前の文字を削除し、削除後のカーソル位置を返す
    ///
    /// 行頭では前の行と結合する。文書の先頭と最終行の次では何もしない。
    pub fn delete_char_before(&mut self, pos: Position) -> Position {
        if pos.row >= self.rows.len() || (pos.row == 0 && pos.col == 0) {
            return pos;
        }

        if pos.col > 0 {
            self.rows[pos.row].delete_char(pos.col - 1);
            highlight::update_syntax(&mut self.rows, pos.row, self.syntax);
            self.dirty += 1;
            return Position::new(pos.row, pos.col - 1);
        }

        let join_col = self.rows[pos.row - 1].len();
        if let Some(removed) = self.delete_row(pos.row) {
            self.rows[pos.row - 1].append(removed.chars());
            highlight::update_syntax(&mut self.rows, pos.row - 1, self.syntax);
            self.dirty += 1;
        }
        Position::new(pos.row - 1, join_col)
    }

    /// `pos` で改行し、次の行の先頭を返す
    pub fn insert_newline(&mut self, pos: Position) -> Position {
        if pos.col == 0 || pos.row >= self.rows.len() {
            self.insert_row(pos.row.min(self.rows.len()), Vec::new());
        } else {
            // insert_row で Vec が伸びるので、先に右側を切り出しておく
            let tail = self.rows[pos.row].split_off(pos.col);
            self.insert_row(pos.row + 1, tail);
            highlight::update_syntax(&mut self.rows, pos.row, self.syntax);
        }
        Position::new(pos.row + 1, 0)
    }

    /// 保存用のバイト列。各行の末尾に改行を付ける
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut out = Vec::with_capacity(len);
        for row in &self.rows {
            out.extend_from_slice(row.chars());
            out.push(b'\n');
        }
        out
    }

    fn reindex_from(&mut self, start: usize) {
        for (index, row) in self.rows.iter_mut().enumerate().skip(start) {
            row.set_index(index);
        }
    }
}
