// パス: src/repl/pipeline.rs
// 役割: 1 行分の文を字句解析から評価まで直列に流す実行器を提供する
// 意図: コマンド処理とセッションループが同じ段階的パイプラインを共有する
// 関連ファイル: src/repl/cmd.rs, src/checker.rs, src/evaluator.rs
//! 文実行パイプラインのモジュール。
//!
//! - 段階は字句→構文→型検査→評価の固定順で、最初の失敗で打ち切る。
//!   途中で失敗した文が環境を部分的に更新することはない。
//! - 成功したターンは出力と環境変換の組を返し、失敗したターンは診断文字列
//!   だけを返す（変換は暗黙に恒等）。外側のループはこれを無条件に展開する。

use thiserror::Error;

use crate::ast::{Statement, Term, Type};
use crate::checker::typecheck;
use crate::env::Environment;
use crate::errors::{EvalError, LexerError, ParseError, TypeError};
use crate::evaluator::{evaluate, step, Step, Value};
use crate::lexer::{tokenize, Token};
use crate::parser::parse;

use super::printer::Output;

/// パイプラインのどの段階で失敗したかを保持するエラー分類。
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Lex(#[from] LexerError),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Check(#[from] TypeError),
    #[error("{0}")]
    Eval(#[from] EvalError),
}

#[derive(Debug, Clone, PartialEq)]
/// 成功したターンが環境へ与える変換。
pub enum EnvTransform {
    /// 環境は変化しない。
    Keep,
    /// 先頭へ束縛を 1 件追加する。
    Extend {
        name: String,
        ty: Type,
        term: Term,
    },
}

impl EnvTransform {
    /// 変換を適用した環境を返す。`Keep` は受け取った値の複製をそのまま返す。
    pub fn apply(&self, env: &Environment) -> Environment {
        match self {
            EnvTransform::Keep => env.clone(),
            EnvTransform::Extend { name, ty, term } => {
                env.extend(name.clone(), ty.clone(), term.clone())
            }
        }
    }
}

/// 1 ターン分の実行結果。診断は暗黙に恒等変換を伴う。
#[derive(Debug)]
pub enum TurnOutcome {
    Rendered {
        output: Output,
        transform: EnvTransform,
    },
    Diagnostic(String),
}

/// 入力テキストを文として実行する。どの段階で失敗してもセッションは続行する。
pub fn execute_statement(src: &str, env: &Environment) -> TurnOutcome {
    match run_statement(src, env) {
        Ok((output, transform)) => TurnOutcome::Rendered { output, transform },
        Err(e) => TurnOutcome::Diagnostic(e.to_string()),
    }
}

fn run_statement(src: &str, env: &Environment) -> Result<(Output, EnvTransform), PipelineError> {
    let tokens = tokenize(src)?;
    let stmt = parse(tokens)?;
    match stmt {
        Statement::BareExpression { expr } => {
            let (ty, checked) = typecheck(&expr, env)?;
            let value = evaluate(&checked)?;
            Ok((
                Output::Doc(format!("{} : {}", value, ty)),
                EnvTransform::Keep,
            ))
        }
        Statement::NamedDefinition { name, expr } => {
            let (ty, checked) = typecheck(&expr, env)?;
            // 定義は評価しない。検査済みの項をそのまま記録して表示する。
            let rendered = format!("{} = {} : {}", name, checked, ty);
            Ok((
                Output::Doc(rendered),
                EnvTransform::Extend {
                    name,
                    ty,
                    term: checked,
                },
            ))
        }
    }
}

/// 字句解析段階のみを実行する。
pub(crate) fn lex_stage(src: &str) -> Result<Vec<Token>, PipelineError> {
    Ok(tokenize(src)?)
}

/// 構文解析段階までを実行する。
pub(crate) fn parse_stage(src: &str) -> Result<Statement, PipelineError> {
    let tokens = tokenize(src)?;
    Ok(parse(tokens)?)
}

/// 検査済みの項を値まで 1 ステップずつ簡約し、途中の項と最終値を返す。
/// 停止しない項ではこの関数も停止しない（言語側の性質をそのまま受け入れる）。
pub(crate) fn reduction_trace(term: &Term) -> Result<(Vec<Term>, Value), PipelineError> {
    let mut steps = Vec::new();
    let mut current = term.clone();
    loop {
        match step(&current)? {
            Step::Next(next) => {
                steps.push(next.clone());
                current = next;
            }
            Step::Value(value) => return Ok((steps, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{execute_statement, reduction_trace, EnvTransform, TurnOutcome};
    use crate::ast::Type;
    use crate::checker::typecheck;
    use crate::env::Environment;
    use crate::evaluator::Value;
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use crate::repl::printer::Output;

    fn checked(src: &str, env: &Environment) -> crate::ast::Term {
        let stmt = parse(tokenize(src).unwrap()).unwrap();
        typecheck(stmt.expr(), env).unwrap().1
    }

    #[test]
    /// 裸の式が評価結果と型を 1 行に描画し、環境を変えないことを確認する。
    fn bare_expression_renders_value_and_type() {
        let env = Environment::new();
        match execute_statement("if true then false else true", &env) {
            TurnOutcome::Rendered { output, transform } => {
                assert_eq!(output, Output::Doc("false : Bool".into()));
                assert_eq!(transform, EnvTransform::Keep);
            }
            TurnOutcome::Diagnostic(msg) => panic!("unexpected diagnostic: {}", msg),
        }
    }

    #[test]
    /// 定義が未評価の検査済み項を描画し、延長変換を返すことを確認する。
    fn definition_renders_unevaluated_term() {
        let env = Environment::new();
        match execute_statement("id = \\x:Bool. x", &env) {
            TurnOutcome::Rendered { output, transform } => {
                assert_eq!(output, Output::Doc("id = \\x:Bool. x : Bool -> Bool".into()));
                let EnvTransform::Extend { ref name, ref ty, .. } = transform else {
                    panic!("expected extend transform");
                };
                assert_eq!(name, "id");
                assert_eq!(
                    *ty,
                    Type::Fun {
                        arg: Box::new(Type::Bool),
                        ret: Box::new(Type::Bool),
                    }
                );
                // 適用して初めて環境が延びる。元の環境はそのまま。
                let extended = transform.apply(&env);
                assert!(env.is_empty());
                assert!(extended.lookup("id").is_some());
            }
            TurnOutcome::Diagnostic(msg) => panic!("unexpected diagnostic: {}", msg),
        }
    }

    #[test]
    /// 各段階の失敗が診断になり、どの場合も環境が変わらないことを確認する。
    fn failures_are_diagnostics_per_stage() {
        let env = Environment::new().extend(
            "t",
            Type::Bool,
            crate::ast::Term::BoolLit { value: true },
        );
        let before: Vec<String> = env.iter().map(|b| format!("{:?}", b)).collect();

        let cases = [
            ("?", "LEX101"),        // 字句
            ("", "PAR001"),         // 構文（空入力）
            ("true )", "PAR090"),   // 構文（残余）
            ("nope", "TYP001"),     // 型（未束縛）
            ("true false", "TYP010"), // 型（非関数適用）
        ];
        for (src, code) in cases {
            match execute_statement(src, &env) {
                TurnOutcome::Diagnostic(msg) => {
                    assert!(msg.contains(code), "{}: {}", src, msg)
                }
                TurnOutcome::Rendered { .. } => panic!("expected diagnostic for {:?}", src),
            }
        }

        let after: Vec<String> = env.iter().map(|b| format!("{:?}", b)).collect();
        assert_eq!(before, after);
    }

    #[test]
    /// 簡約列の反復が big-step 評価と同じ値に到達することを確認する。
    fn trace_agrees_with_evaluate() {
        let env = Environment::new();
        let term = checked("(\\x:Bool. if x then false else true) true", &env);
        let (steps, value) = reduction_trace(&term).unwrap();
        assert!(!steps.is_empty());
        assert_eq!(value, Value::Bool(false));
        assert_eq!(crate::evaluator::evaluate(&term).unwrap(), value);
    }
}
