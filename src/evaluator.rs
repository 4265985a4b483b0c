//! 評価器（evaluator）
//!
//! 目的:
//! - 検査済みの閉じた項に対する正格（値呼び）の big-step 評価 `evaluate` と、
//!   最左簡約を 1 回だけ進める `step` を提供する。
//! - どちらも環境を受け取らない。定義は型検査の時点で項へ展開済み。
//!
//! 仕様要点:
//! - well-typed な閉じた項では失敗しない。`EvalError` は行き詰まり項の防衛用。
//! - 停止しない項はそのまま停止しない。打ち切りは行わない。

use std::fmt;

use crate::ast::{Term, Type};
use crate::errors::EvalError;

#[derive(Clone, Debug, PartialEq)]
/// 評価の最終結果。真偽値かラムダ抽象のどちらか。
pub enum Value {
    Bool(bool),
    Abs {
        param: String,
        param_ty: Type,
        body: Term,
    },
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Abs {
                param,
                param_ty,
                body,
            } => write!(f, "\\{param}:{param_ty}. {body}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// `step` の 1 回分の結果。
pub enum Step {
    /// 簡約が 1 回進んだ。
    Next(Term),
    /// 既に値形に達している。
    Value(Value),
}

/// 検査済みの閉じた項を big-step で評価する。
pub fn evaluate(term: &Term) -> Result<Value, EvalError> {
    match term {
        Term::BoolLit { value } => Ok(Value::Bool(*value)),
        Term::Abs {
            param,
            param_ty,
            body,
        } => Ok(Value::Abs {
            param: param.clone(),
            param_ty: param_ty.clone(),
            body: (**body).clone(),
        }),
        Term::Var { name } => Err(EvalError::new(
            "EVAL001",
            format!("未束縛変数です: {}", name),
            None,
        )),
        Term::App { func, arg } => {
            let func_val = evaluate(func)?;
            let arg_val = evaluate(arg)?;
            match func_val {
                Value::Abs { param, body, .. } => {
                    let image = value_term(&arg_val);
                    evaluate(&subst(&body, &param, &image))
                }
                Value::Bool(_) => Err(EvalError::new(
                    "EVAL010",
                    "関数ではない値を適用しました",
                    None,
                )),
            }
        }
        Term::If {
            cond,
            then_branch,
            else_branch,
        } => match evaluate(cond)? {
            Value::Bool(true) => evaluate(then_branch),
            Value::Bool(false) => evaluate(else_branch),
            Value::Abs { .. } => Err(EvalError::new(
                "EVAL011",
                "if の条件が真偽値ではありません",
                None,
            )),
        },
    }
}

/// 値呼びの最左簡約を 1 回だけ進める。
pub fn step(term: &Term) -> Result<Step, EvalError> {
    match term {
        Term::BoolLit { value } => Ok(Step::Value(Value::Bool(*value))),
        Term::Abs {
            param,
            param_ty,
            body,
        } => Ok(Step::Value(Value::Abs {
            param: param.clone(),
            param_ty: param_ty.clone(),
            body: (**body).clone(),
        })),
        Term::Var { name } => Err(EvalError::new(
            "EVAL001",
            format!("未束縛変数です: {}", name),
            None,
        )),
        Term::App { func, arg } => {
            if let Step::Next(func2) = step(func)? {
                return Ok(Step::Next(Term::App {
                    func: Box::new(func2),
                    arg: arg.clone(),
                }));
            }
            if let Step::Next(arg2) = step(arg)? {
                return Ok(Step::Next(Term::App {
                    func: func.clone(),
                    arg: Box::new(arg2),
                }));
            }
            // 両辺が値形。β 簡約するか、行き詰まりを報告する。
            match func.as_ref() {
                Term::Abs { param, body, .. } => Ok(Step::Next(subst(body, param, arg))),
                _ => Err(EvalError::new(
                    "EVAL010",
                    "関数ではない値を適用しました",
                    None,
                )),
            }
        }
        Term::If {
            cond,
            then_branch,
            else_branch,
        } => {
            if let Step::Next(cond2) = step(cond)? {
                return Ok(Step::Next(Term::If {
                    cond: Box::new(cond2),
                    then_branch: then_branch.clone(),
                    else_branch: else_branch.clone(),
                }));
            }
            match cond.as_ref() {
                Term::BoolLit { value: true } => Ok(Step::Next((**then_branch).clone())),
                Term::BoolLit { value: false } => Ok(Step::Next((**else_branch).clone())),
                _ => Err(EvalError::new(
                    "EVAL011",
                    "if の条件が真偽値ではありません",
                    None,
                )),
            }
        }
    }
}

/// 値を項表現へ戻す。置換の材料に使う。
fn value_term(value: &Value) -> Term {
    match value {
        Value::Bool(b) => Term::BoolLit { value: *b },
        Value::Abs {
            param,
            param_ty,
            body,
        } => Term::Abs {
            param: param.clone(),
            param_ty: param_ty.clone(),
            body: Box::new(body.clone()),
        },
    }
}

// 置換される項は常に閉じている（型検査が保証する）ため捕獲は起きず、
// α 変換なしで構造的に置き換えるだけでよい。
/// `body` 中の自由出現 `param` を項 `image` で置き換える。
fn subst(body: &Term, param: &str, image: &Term) -> Term {
    match body {
        Term::Var { name } => {
            if name == param {
                image.clone()
            } else {
                body.clone()
            }
        }
        Term::BoolLit { .. } => body.clone(),
        Term::Abs {
            param: p,
            param_ty,
            body: b,
        } => {
            if p == param {
                // 内側の束縛が遮るのでここで打ち切る
                body.clone()
            } else {
                Term::Abs {
                    param: p.clone(),
                    param_ty: param_ty.clone(),
                    body: Box::new(subst(b, param, image)),
                }
            }
        }
        Term::App { func, arg } => Term::App {
            func: Box::new(subst(func, param, image)),
            arg: Box::new(subst(arg, param, image)),
        },
        Term::If {
            cond,
            then_branch,
            else_branch,
        } => Term::If {
            cond: Box::new(subst(cond, param, image)),
            then_branch: Box::new(subst(then_branch, param, image)),
            else_branch: Box::new(subst(else_branch, param, image)),
        },
    }
}
