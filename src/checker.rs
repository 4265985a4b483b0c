// パス: src/checker.rs
// 役割: 注釈付き単純型ラムダ計算の宣言的型検査を提供する
// 意図: 型付けと同時にセッション定義を項へ展開し、評価を環境から切り離す
// 関連ファイル: src/ast.rs, src/env.rs, tests/types_check.rs
//! 型検査モジュール
//!
//! - ラムダ束縛はスコープスタックで管理し、自由変数はセッション環境から
//!   解決する。束縛が定義より優先される。
//! - 解決された定義は記録済みの検査済み項をその場へ展開する。環境に入る
//!   項は閉じているため、返る検査済み項も閉じており、評価は環境を要らない。

use crate::ast::{Term, Type};
use crate::env::Environment;
use crate::errors::TypeError;

/// 式を検査し、推論された型と定義展開済みの検査済み項を返す。
pub fn typecheck(expr: &Term, env: &Environment) -> Result<(Type, Term), TypeError> {
    let mut scope = Vec::new();
    check(expr, env, &mut scope)
}

fn check(
    expr: &Term,
    env: &Environment,
    scope: &mut Vec<(String, Type)>,
) -> Result<(Type, Term), TypeError> {
    match expr {
        Term::Var { name } => {
            if let Some((_, ty)) = scope.iter().rev().find(|(n, _)| n == name) {
                return Ok((ty.clone(), expr.clone()));
            }
            match env.lookup(name) {
                Some(binding) => Ok((binding.ty.clone(), binding.term.clone())),
                None => Err(TypeError::new(
                    "TYP001",
                    format!("未束縛変数です: {}", name),
                    None,
                )),
            }
        }
        Term::BoolLit { .. } => Ok((Type::Bool, expr.clone())),
        Term::Abs {
            param,
            param_ty,
            body,
        } => {
            scope.push((param.clone(), param_ty.clone()));
            let checked_body = check(body, env, scope);
            scope.pop();
            let (body_ty, body_term) = checked_body?;
            Ok((
                Type::Fun {
                    arg: Box::new(param_ty.clone()),
                    ret: Box::new(body_ty),
                },
                Term::Abs {
                    param: param.clone(),
                    param_ty: param_ty.clone(),
                    body: Box::new(body_term),
                },
            ))
        }
        Term::App { func, arg } => {
            let (func_ty, func_term) = check(func, env, scope)?;
            let (arg_ty, arg_term) = check(arg, env, scope)?;
            match func_ty {
                Type::Fun { arg: expected, ret } => {
                    if *expected != arg_ty {
                        return Err(TypeError::new(
                            "TYP011",
                            format!("引数の型が一致しません: 期待 {} 実際 {}", expected, arg_ty),
                            None,
                        ));
                    }
                    Ok((
                        *ret,
                        Term::App {
                            func: Box::new(func_term),
                            arg: Box::new(arg_term),
                        },
                    ))
                }
                other => Err(TypeError::new(
                    "TYP010",
                    format!("関数型ではない項を適用しています: {}", other),
                    None,
                )),
            }
        }
        Term::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let (cond_ty, cond_term) = check(cond, env, scope)?;
            if cond_ty != Type::Bool {
                return Err(TypeError::new(
                    "TYP020",
                    format!("if の条件には Bool が必要です: {}", cond_ty),
                    None,
                ));
            }
            let (then_ty, then_term) = check(then_branch, env, scope)?;
            let (else_ty, else_term) = check(else_branch, env, scope)?;
            if then_ty != else_ty {
                return Err(TypeError::new(
                    "TYP021",
                    format!("if の両腕の型が一致しません: {} と {}", then_ty, else_ty),
                    None,
                ));
            }
            Ok((
                then_ty,
                Term::If {
                    cond: Box::new(cond_term),
                    then_branch: Box::new(then_term),
                    else_branch: Box::new(else_term),
                },
            ))
        }
    }
}
