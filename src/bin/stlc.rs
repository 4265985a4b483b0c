// パス: src/bin/stlc.rs
// 役割: REPL を起動するバイナリエントリポイント
// 意図: 対話的な言語探索用の CLI 実行ファイルを提供する
// 関連ファイル: src/repl/mod.rs, src/lib.rs, src/repl/cmd.rs

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "stlc-repl",
    version,
    about = "Bool 付き単純型ラムダ計算の対話コンソール"
)]
struct Cli {}

fn main() {
    let _cli = Cli::parse();
    stlc::repl::run_repl();
}
