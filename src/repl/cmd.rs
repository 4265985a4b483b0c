// パス: src/repl/cmd.rs
// 役割: セッションループとコマンド表、接頭辞ディスパッチを担当する
// 意図: 読取→分類→実行→環境引き継ぎの状態機械を 1 箇所に集める
// 関連ファイル: src/repl/pipeline.rs, src/repl/printer.rs, src/repl/input.rs
//! コマンド処理とセッション状態遷移のモジュール。
//!
//! - 入力行はコマンド（先頭 `:`）か文のどちらかに分類される。
//! - コマンド名は固定表に対する接頭辞一致で解決し、一意に定まる限り
//!   省略形を受け付ける。コマンドは環境を参照するだけで決して変更しない。
//! - 文の失敗はそのターン内で回復し、環境は変化しない。セッションを
//!   終了させるのは `:quit` と入力終端だけ。

use std::io::{self, Write};

use thiserror::Error;

use crate::ast::Term;
use crate::checker::typecheck;
use crate::env::Environment;
use crate::evaluator::evaluate;
use crate::lexer::Token;
use crate::parser::parse;

use super::input::{LineSource, ReadResult, StdinSource};
use super::pipeline::{
    execute_statement, lex_stage, parse_stage, reduction_trace, PipelineError, TurnOutcome,
};
use super::printer::{render, Output, BANNER, FAREWELL};

const PROMPT: &str = "> ";

/// 対話セッションを開始し、入力が尽きるか `:quit` されるまで処理し続ける。
///
/// # Examples
/// ```no_run
/// # fn main() {
/// stlc::repl::run_repl();
/// # }
/// ```
pub fn run_repl() {
    let mut source = StdinSource;
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    if let Err(err) = run_repl_with(&mut source, &mut stdout, &mut stderr) {
        let _ = writeln!(stderr, "REPL 実行中に入出力エラーが発生しました: {}", err);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// 解決済みコマンドの識別子。
pub(crate) enum Cmd {
    Quit,
    Lex,
    Parse,
    Eval,
    Step,
    Type,
    All,
}

/// 固定のコマンド表。起動後に変更されることはない。表の並びはあいまい時の
/// 候補列挙順を兼ねる。追加する場合は既存名との接頭辞衝突がないことを
/// 確認すること（衝突した名前は短縮形が永久にあいまいになる）。
pub(crate) static COMMAND_TABLE: &[(&str, Cmd)] = &[
    ("quit", Cmd::Quit),
    ("lex", Cmd::Lex),
    ("parse", Cmd::Parse),
    ("eval", Cmd::Eval),
    ("step", Cmd::Step),
    ("type", Cmd::Type),
    ("all", Cmd::All),
];

#[derive(Debug, Error, PartialEq, Eq)]
/// コマンド名解決の失敗分類。どちらもセッションを止めない。
pub(crate) enum DispatchError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Ambiguous command: {name}\n  {}", .candidates.join("\n  "))]
    AmbiguousCommand {
        name: String,
        candidates: Vec<&'static str>,
    },
}

/// コマンド名を表引きで解決する。与えられた名前を接頭辞に持つ項目が
/// ちょうど 1 つのときだけ成功する。
pub(crate) fn resolve_command(name: &str) -> Result<Cmd, DispatchError> {
    let matches: Vec<(&'static str, Cmd)> = COMMAND_TABLE
        .iter()
        .filter(|(full, _)| full.starts_with(name))
        .copied()
        .collect();
    match matches.as_slice() {
        [] => Err(DispatchError::UnknownCommand(name.to_string())),
        [(_, cmd)] => Ok(*cmd),
        many => Err(DispatchError::AmbiguousCommand {
            name: name.to_string(),
            candidates: many.iter().map(|(full, _)| *full).collect(),
        }),
    }
}

/// デリミタを除いたコマンド行を名前と引数に分割する。
/// 名前は最初の空白まで。`:` 直後の空白は名前を空にする（＝あいまい）。
fn split_command(rest: &str) -> (&str, &str) {
    match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim()),
        None => (rest, ""),
    }
}

/// セッションループ本体。環境はループ局所の 1 変数で、ターンごとに
/// 再束縛して引き継ぐ。共有可変セルは存在しない。
pub(crate) fn run_repl_with<S, W, E>(source: &mut S, out: &mut W, err: &mut E) -> io::Result<()>
where
    S: LineSource,
    W: Write,
    E: Write,
{
    writeln!(out, "{}", *BANNER)?;
    let mut env = Environment::new();
    let mut keep_looping = true;
    while keep_looping {
        let line = match source.read_line(PROMPT)? {
            ReadResult::Line(line) => line,
            // 入力終端は :quit と同じ遷移
            ReadResult::Eof => break,
        };
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix(':') {
            let (name, args) = split_command(rest);
            match resolve_command(name) {
                Ok(cmd) => {
                    keep_looping = run_command(cmd, args, &env, out, err)?;
                }
                Err(e) => {
                    // 解決失敗はセッションを止めない
                    writeln!(err, "{}", e)?;
                }
            }
        } else {
            // 空行もそのまま文パイプラインへ送り、診断を可視化する
            match execute_statement(trimmed, &env) {
                TurnOutcome::Rendered { output, transform } => {
                    render(out, &output)?;
                    env = transform.apply(&env);
                }
                TurnOutcome::Diagnostic(msg) => {
                    writeln!(err, "{}", msg)?;
                }
            }
        }
    }
    // 終了経路は :quit と入力終端の 2 つだが、挨拶の出口はこの 1 箇所だけ
    writeln!(out, "{}", FAREWELL)?;
    Ok(())
}

/// 解決済みコマンドを実行し、セッションを続けるかどうかを返す。
fn run_command<W, E>(
    cmd: Cmd,
    args: &str,
    env: &Environment,
    out: &mut W,
    err: &mut E,
) -> io::Result<bool>
where
    W: Write,
    E: Write,
{
    match command_output(cmd, args, env) {
        Ok(output) => render(out, &output)?,
        Err(e) => writeln!(err, "{}", e)?,
    }
    Ok(!matches!(cmd, Cmd::Quit))
}

/// コマンド本体。引数の式を段階別に処理して出力形を組み立てる。
/// どのコマンドも環境には触れない。
fn command_output(cmd: Cmd, args: &str, env: &Environment) -> Result<Output, PipelineError> {
    match cmd {
        Cmd::Quit => Ok(Output::Quiet),
        Cmd::Lex => Ok(Output::Doc(render_tokens(&lex_stage(args)?))),
        Cmd::Parse => Ok(Output::Doc(format!("{:#?}", parse_stage(args)?))),
        Cmd::Type => {
            let stmt = parse_stage(args)?;
            let (ty, _) = typecheck(stmt.expr(), env)?;
            Ok(Output::Doc(format!("-- {}", ty)))
        }
        Cmd::Eval => {
            let stmt = parse_stage(args)?;
            let (_, checked) = typecheck(stmt.expr(), env)?;
            Ok(Output::Show(evaluate(&checked)?))
        }
        Cmd::Step => {
            let stmt = parse_stage(args)?;
            let (_, checked) = typecheck(stmt.expr(), env)?;
            Ok(Output::Doc(render_trace(&checked)?))
        }
        Cmd::All => {
            let tokens = lex_stage(args)?;
            let stmt = parse(tokens.clone())?;
            let (ty, checked) = typecheck(stmt.expr(), env)?;
            let (_, value) = reduction_trace(&checked)?;
            let doc = [
                "-- tokens".to_string(),
                render_tokens(&tokens),
                "-- parse".to_string(),
                format!("{:#?}", stmt),
                "-- type".to_string(),
                format!("{}", ty),
                "-- steps".to_string(),
                render_trace(&checked)?,
                "-- value".to_string(),
                format!("{}", value),
            ]
            .join("\n");
            Ok(Output::Doc(doc))
        }
    }
}

/// `:lex` 用のトークン一覧ドキュメントを組み立てる。
fn render_tokens(tokens: &[Token]) -> String {
    let lines: Vec<String> = tokens
        .iter()
        .map(|t| format!("  {:?} {:?} @line={},col={}", t.kind, t.value, t.line, t.col))
        .collect();
    lines.join("\n")
}

/// `:step` 用の簡約列ドキュメントを組み立てる。最終行が値形になる。
fn render_trace(checked: &Term) -> Result<String, PipelineError> {
    let (steps, _) = reduction_trace(checked)?;
    let mut lines = vec![checked.to_string()];
    lines.extend(steps.iter().map(|t| format!("=> {}", t)));
    Ok(lines.join("\n"))
}
