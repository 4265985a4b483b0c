// パス: src/repl/input.rs
// 役割: セッションループが使う行入力の抽象と標準入力実装
// 意図: 読取をトレイトの向こうへ隔離し、テストをスクリプト駆動にする
// 関連ファイル: src/repl/cmd.rs
//! 行入力モジュール
//!
//! ループ 1 周あたりの停止点はここでの 1 行読取だけ。履歴や行編集は
//! 持たない（プロセスをまたぐ永続化は非目標）。

use std::io::{self, BufRead, Write};

/// 行入力が返す 2 種類の結果を表す列挙体。
pub(crate) enum ReadResult {
    Line(String),
    Eof,
}

/// セッションループが必要とする最小の行入力インタフェース。
pub(crate) trait LineSource {
    /// プロンプトを表示して 1 行読む。入力が尽きたら `Eof` を返す。
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadResult>;
}

/// 標準入力から 1 行ずつ読む既定の実装。
pub(crate) struct StdinSource;

impl LineSource for StdinSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadResult> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;
        let mut line = String::new();
        let bytes = io::stdin().lock().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(ReadResult::Eof);
        }
        if line.ends_with('\n') {
            line.pop();
        }
        if line.ends_with('\r') {
            line.pop();
        }
        Ok(ReadResult::Line(line))
    }
}
