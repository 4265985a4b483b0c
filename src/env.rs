//! セッション環境（Environment)
//!
//! 目的:
//! - 利用者定義 `(名前, 型, 検査済み項)` の不変テーブルを提供する。
//!
//! 設計ノート:
//! - 先頭共有の永続リスト。`extend` は常に新しい値を返し、古い値は
//!   そのまま有効（既にそれを捕まえたターンだけが保持し続ける）。
//! - 照会は新しい束縛を優先する（シャドーイング）。削除操作は存在しない。

use std::rc::Rc;

use crate::ast::{Term, Type};

#[derive(Clone, Debug, PartialEq)]
/// 環境に記録される 1 件分の束縛。
pub struct Binding {
    pub name: String,
    pub ty: Type,
    pub term: Term,
}

#[derive(Clone, Debug, Default)]
/// 不変のセッション環境。ターン間は値渡しで引き継ぐ。
pub struct Environment {
    head: Option<Rc<Node>>,
}

#[derive(Debug)]
struct Node {
    binding: Binding,
    next: Option<Rc<Node>>,
}

impl Environment {
    /// 空の環境を作る。セッション開始時に 1 度だけ呼ばれる。
    pub fn new() -> Self {
        Self { head: None }
    }

    /// 束縛を 1 件先頭に足した新しい環境を返す。受け手自身は変化しない。
    #[must_use]
    pub fn extend(&self, name: impl Into<String>, ty: Type, term: Term) -> Self {
        Self {
            head: Some(Rc::new(Node {
                binding: Binding {
                    name: name.into(),
                    ty,
                    term,
                },
                next: self.head.clone(),
            })),
        }
    }

    /// 最近追加された束縛を優先して名前を引く。
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.iter().find(|b| b.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// 新しい順に束縛を辿るイテレータ。
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            cur: self.head.as_deref(),
        }
    }
}

impl PartialEq for Environment {
    /// 束縛列の内容比較。ノードを共有しているかどうかは問わない。
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

pub struct Iter<'a> {
    cur: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Binding;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur?;
        self.cur = node.next.as_deref();
        Some(&node.binding)
    }
}
