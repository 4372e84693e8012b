//! インクリメンタル検索
//!
//! 入力のたびに [`SearchState::step`] が呼ばれ、一致した行へカーソルを移して
//! その部分を [`Highlight::Match`] で塗る。塗り替えた行の分類は保存しておき、
//! 次の判定の前と検索の終了時に必ず元へ戻す。

use crate::buffer::Buffer;
use crate::cursor::Cursor;
use crate::editor::{Editor, PromptHandler};
use crate::highlight::Highlight;
use crate::key::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

/// 検索 1 回分の状態。プロンプトの開始から終了までだけ存在する
pub struct SearchState {
    last_match: Option<usize>,
    direction: SearchDirection,
    /// Match で上書きした行と、その元の分類
    saved_hl: Option<(usize, Vec<Highlight>)>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            last_match: None,
            direction: SearchDirection::Forward,
            saved_hl: None,
        }
    }

    pub fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// 入力 1 回分の処理
    ///
    /// 矢印キーで前後の一致へ移動し、それ以外のキーでは先頭から探し直す。
    /// Enter / Escape で検索を終える。
    pub fn step(&mut self, buffer: &mut Buffer, cursor: &mut Cursor, query: &str, key: Key) {
        self.restore_highlight(buffer);

        match key {
            Key::Enter | Key::Escape => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
                return;
            }
            Key::ArrowRight | Key::ArrowDown => self.direction = SearchDirection::Forward,
            Key::ArrowLeft | Key::ArrowUp => self.direction = SearchDirection::Backward,
            _ => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
            }
        }
        if self.last_match.is_none() {
            self.direction = SearchDirection::Forward;
        }

        let len = buffer.len();
        if query.is_empty() || len == 0 {
            return;
        }

        let mut current = self.last_match;
        for _ in 0..len {
            let next = match (current, self.direction) {
                (None, _) => 0,
                (Some(i), SearchDirection::Forward) => (i + 1) % len,
                (Some(0), SearchDirection::Backward) => len - 1,
                (Some(i), SearchDirection::Backward) => i - 1,
            };
            current = Some(next);

            let Some(row) = buffer.row(next) else {
                continue;
            };
            let Some(rx) = find(row.render(), query.as_bytes()) else {
                continue;
            };

            self.last_match = Some(next);
            cursor.cy = next;
            cursor.cx = row.rx_to_cx(rx);
            // 次の scroll で一致した行が画面の先頭に来る
            cursor.row_offset = len;

            let saved = row.highlight().to_vec();
            if let Some(row) = buffer.row_mut(next) {
                row.mark_range(rx, query.len(), Highlight::Match);
            }
            self.saved_hl = Some((next, saved));
            log::debug!("search match for {query:?} at row {next}, column {rx}");
            break;
        }
    }

    fn restore_highlight(&mut self, buffer: &mut Buffer) {
        if let Some((line, hl)) = self.saved_hl.take()
            && let Some(row) = buffer.row_mut(line)
        {
            row.replace_highlight(hl);
        }
    }
}

impl PromptHandler for SearchState {
    fn on_key(&mut self, editor: &mut Editor, input: &str, key: Key) {
        let (buffer, cursor) = editor.buffer_and_cursor_mut();
        self.step(buffer, cursor, input, key);
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
