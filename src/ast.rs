//! 抽象構文木（AST）
//!
//! 目的:
//! - 構文解析結果を型検査/評価で共用できる中立的な表現に落とし込む。
//!
//! 設計ノート:
//! - 項（`Term`）と型（`Type`）は Bool 付き単純型ラムダ計算のみ。
//! - 文（`Statement`）は REPL の 1 行に対応し、「裸の式」か
//!   「名前付き定義」のどちらかに必ず分類される。

use std::fmt;

// 項ノード
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Var {
        name: String,
    },
    BoolLit {
        value: bool,
    },
    Abs {
        param: String,
        param_ty: Type,
        body: Box<Term>,
    },
    App {
        func: Box<Term>,
        arg: Box<Term>,
    },
    If {
        cond: Box<Term>,
        then_branch: Box<Term>,
        else_branch: Box<Term>,
    },
}

// 型ノード
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Bool,
    Fun { arg: Box<Type>, ret: Box<Type> },
}

#[derive(Clone, Debug, PartialEq)]
/// REPL の 1 行が解析されてできるトップレベル文。
pub enum Statement {
    /// 値を見るためだけに評価される式。環境は変化しない。
    BareExpression { expr: Term },
    /// `name = expr` 形式の定義。成功すると環境が 1 件延長される。
    NamedDefinition { name: String, expr: Term },
}

impl Statement {
    /// 文が含む式への参照。コマンドの段階照会と実行器で共用する。
    pub fn expr(&self) -> &Term {
        match self {
            Statement::BareExpression { expr } => expr,
            Statement::NamedDefinition { expr, .. } => expr,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var { name } => write!(f, "{name}"),
            Term::BoolLit { value } => write!(f, "{}", if *value { "true" } else { "false" }),
            Term::Abs {
                param,
                param_ty,
                body,
            } => write!(f, "\\{param}:{param_ty}. {body}"),
            Term::App { func, arg } => write!(f, "({} {})", func, arg),
            Term::If {
                cond,
                then_branch,
                else_branch,
            } => write!(f, "if {} then {} else {}", cond, then_branch, else_branch),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "Bool"),
            // `->` は右結合。左腕が関数型のときだけ括弧が要る。
            Type::Fun { arg, ret } => match arg.as_ref() {
                Type::Fun { .. } => write!(f, "({}) -> {}", arg, ret),
                Type::Bool => write!(f, "{} -> {}", arg, ret),
            },
        }
    }
}
