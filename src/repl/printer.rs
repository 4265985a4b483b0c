// パス: src/repl/printer.rs
// 役割: ターン出力の 3 形態と描画規則、バナー/別れの挨拶を集約する
// 意図: 表示形式を一箇所にまとめ、対話時の出力を統一する
// 関連ファイル: src/repl/cmd.rs, src/repl/pipeline.rs, src/evaluator.rs
//! REPL の出力整形モジュール。
//!
//! 結果がどの形で描画されるかは `Output` の構築時点で確定する。重なりの
//! 解決（Doc > Quiet > Show）は列挙のタグ付けそのものであり、描画側は
//! 網羅的な match を 1 つ持つだけでよい。

use std::io::{self, Write};

use once_cell::sync::Lazy;

use crate::evaluator::Value;

/// 起動時に 1 度だけ表示するバナー。バージョンは Cargo から埋め込む。
pub(crate) static BANNER: Lazy<String> = Lazy::new(|| {
    format!(
        "STLC REPL (Rust) v{} :: `名前 = 式` で定義 :: :quit で終了",
        env!("CARGO_PKG_VERSION")
    )
});

/// 終了時に必ず 1 度だけ表示する固定の別れの挨拶。
pub(crate) const FAREWELL: &str = "Goodbye.";

#[derive(Debug, Clone, PartialEq)]
/// ターンが生み出す出力の 3 形態。
pub enum Output {
    /// 整形済みの構造化テキスト。そのまま出力する。
    Doc(String),
    /// 出力なしの明示シグナル。何も書かない。
    Quiet,
    /// 汎用の表示可能値。既定のレンダラ（`Display`）で出力する。
    Show(Value),
}

/// 結果形態ごとの描画規則。必ずちょうど 1 つの腕が適用される。
pub fn render<W: Write>(out: &mut W, output: &Output) -> io::Result<()> {
    match output {
        Output::Doc(text) => writeln!(out, "{}", text),
        Output::Quiet => Ok(()),
        Output::Show(value) => writeln!(out, "{}", value),
    }
}
