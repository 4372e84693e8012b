use crate::KILO_TAB_STOP;
use crate::highlight::Highlight;

/// 文書の 1 行
///
/// `chars` が編集対象の生バイト列で、`render` はタブを空白に展開した表示用の列。
/// `hl` は `render` と同じ長さで、表示用の各バイトの分類を持つ。
#[derive(Debug, Clone)]
pub struct Row {
    index: usize,
    chars: Vec<u8>,
    render: Vec<u8>,
    hl: Vec<Highlight>,
    /// 行末がブロックコメントの途中か
    hl_open_comment: bool,
}

impl Row {
    pub fn new(index: usize, chars: Vec<u8>) -> Self {
        let mut row = Self {
            index,
            chars,
            render: Vec::new(),
            hl: Vec::new(),
            hl_open_comment: false,
        };
        row.update_render();
        row
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    pub fn render(&self) -> &[u8] {
        &self.render
    }

    pub fn highlight(&self) -> &[Highlight] {
        &self.hl
    }

    pub fn open_comment(&self) -> bool {
        self.hl_open_comment
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    /// 生の列位置を表示上の列位置に変換する
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        self.chars
            .iter()
            .take(cx)
            .fold(0, |rx, &c| if c == b'\t' { next_tab_stop(rx) } else { rx + 1 })
    }

    /// 表示上の列位置を生の列位置に変換する
    ///
    /// タブの途中を指す場合はそのタブの位置を返す。
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &c) in self.chars.iter().enumerate() {
            cur_rx = if c == b'\t' { next_tab_stop(cur_rx) } else { cur_rx + 1 };
            if cur_rx > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    /// `at` が行末を超える場合は末尾に追加する
    pub(crate) fn insert_char(&mut self, at: usize, c: u8) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, c);
        self.update_render();
    }

    pub(crate) fn delete_char(&mut self, at: usize) -> Option<u8> {
        if at >= self.chars.len() {
            return None;
        }
        let c = self.chars.remove(at);
        self.update_render();
        Some(c)
    }

    pub(crate) fn append(&mut self, s: &[u8]) {
        self.chars.extend_from_slice(s);
        self.update_render();
    }

    /// `at` 以降を切り離して返す
    pub(crate) fn split_off(&mut self, at: usize) -> Vec<u8> {
        let tail = self.chars.split_off(at.min(self.chars.len()));
        self.update_render();
        tail
    }

    /// 強調表示の結果を反映し、行末のコメント状態が変わったかを返す
    pub(crate) fn set_highlight(&mut self, hl: Vec<Highlight>, open_comment: bool) -> bool {
        debug_assert_eq!(hl.len(), self.render.len());
        self.hl = hl;
        let changed = self.hl_open_comment != open_comment;
        self.hl_open_comment = open_comment;
        changed
    }

    /// 検索結果の表示用。呼び出し側が元の分類を保存して戻す
    pub(crate) fn replace_highlight(&mut self, hl: Vec<Highlight>) -> Vec<Highlight> {
        debug_assert_eq!(hl.len(), self.render.len());
        std::mem::replace(&mut self.hl, hl)
    }

    pub(crate) fn mark_range(&mut self, start: usize, len: usize, class: Highlight) {
        let end = (start + len).min(self.hl.len());
        if start < end {
            self.hl[start..end].fill(class);
        }
    }

    fn update_render(&mut self) {
        let tabs = self.chars.iter().filter(|&&c| c == b'\t').count();
        let mut render = Vec::with_capacity(self.chars.len() + tabs * (KILO_TAB_STOP - 1));
        for &c in &self.chars {
            if c == b'\t' {
                render.push(b' ');
                while render.len() % KILO_TAB_STOP != 0 {
                    render.push(b' ');
                }
            } else {
                render.push(c);
            }
        }
        self.render = render;
        // 再計算されるまでは Normal で長さだけ合わせておく
        self.hl = vec![Highlight::Normal; self.render.len()];
    }
}

fn next_tab_stop(rx: usize) -> usize {
    rx + (KILO_TAB_STOP - rx % KILO_TAB_STOP)
}
