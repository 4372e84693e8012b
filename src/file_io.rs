use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
};

pub struct FileIO;

impl FileIO {
    /// ファイルを行ごとに読み込む。行末の `\r\n` / `\n` は取り除く
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Vec<Vec<u8>>> {
        let content = std::fs::read(path)?;
        Ok(split_lines(&content))
    }

    /// 内容全体で置き換え、書き込んだバイト数を返す
    pub fn save<P: AsRef<Path>>(path: P, content: &[u8]) -> io::Result<usize> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        // 書き込む長さに合わせてから 1 度で書き込む
        file.set_len(content.len() as u64)?;
        file.write_all(content)?;
        file.flush()?;
        Ok(content.len())
    }
}

fn split_lines(content: &[u8]) -> Vec<Vec<u8>> {
    if content.is_empty() {
        return Vec::new();
    }

    let body = content.strip_suffix(b"\n").unwrap_or(content);
    body.split(|&b| b == b'\n')
        .map(|line| {
            let mut end = line.len();
            while end > 0 && line[end - 1] == b'\r' {
                end -= 1;
            }
            line[..end].to_vec()
        })
        .collect()
}
