use bitflags::bitflags;

bitflags! {
    /// プロファイルごとに有効にする強調表示
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SyntaxFlags: u8 {
        const NUMBERS = 1 << 0;
        const STRINGS = 1 << 1;
    }
}

/// 2 種類目のキーワードを示す末尾の印
pub const KEYWORD2_MARKER: u8 = b'|';

/// ファイル種別ごとの強調表示ルール
#[derive(Debug)]
pub struct Syntax {
    pub filetype: &'static str,
    /// `.` で始まるものは拡張子、それ以外はファイル名の部分一致
    pub filematch: &'static [&'static str],
    /// 型名が 1 種類目、末尾が `|` の制御構文などが 2 種類目
    pub keywords: &'static [&'static str],
    pub singleline_comment_start: &'static str,
    pub multiline_comment_start: &'static str,
    pub multiline_comment_end: &'static str,
    pub flags: SyntaxFlags,
}

impl Syntax {
    /// ファイル名に合うプロファイルを探す
    pub fn for_filename(filename: &str) -> Option<&'static Syntax> {
        let ext = filename.rfind('.').map(|i| &filename[i..]);

        HLDB.iter().find(|syntax| {
            syntax.filematch.iter().any(|pattern| {
                if pattern.starts_with('.') {
                    ext == Some(*pattern)
                } else {
                    filename.contains(pattern)
                }
            })
        })
    }

    pub fn highlights_numbers(&self) -> bool {
        self.flags.contains(SyntaxFlags::NUMBERS)
    }

    pub fn highlights_strings(&self) -> bool {
        self.flags.contains(SyntaxFlags::STRINGS)
    }
}

pub static HLDB: &[Syntax] = &[
    Syntax {
        filetype: "c",
        filematch: &[".c", ".h", ".cpp"],
        keywords: &[
            "switch|", "if|", "while|", "for|", "break|", "continue|", "return|", "else|",
            "struct|", "union|", "typedef|", "static|", "enum|", "class|", "case|", "int", "long",
            "double", "float", "char", "unsigned", "signed", "void",
        ],
        singleline_comment_start: "//",
        multiline_comment_start: "/*",
        multiline_comment_end: "*/",
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
    Syntax {
        filetype: "rust",
        filematch: &[".rs"],
        keywords: &[
            "as|", "break|", "const|", "continue|", "crate|", "else|", "enum|", "fn|", "for|",
            "if|", "impl|", "in|", "let|", "loop|", "match|", "mod|", "move|", "mut|", "pub|",
            "return|", "self|", "static|", "struct|", "trait|", "type|", "unsafe|", "use|",
            "where|", "while|", "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64",
            "usize", "f32", "f64", "bool", "char", "str", "String", "Self",
        ],
        singleline_comment_start: "//",
        multiline_comment_start: "/*",
        multiline_comment_end: "*/",
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
];
