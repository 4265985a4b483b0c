// パス: src/parser.rs
// 役割: トークン列から文・式・型注釈を組み立てる再帰下降パーサ
// 意図: 字句解析結果を型検査・評価に渡せる AST へ変換する
// 関連ファイル: src/lexer.rs, src/ast.rs, tests/lexer_parser.rs
//! 構文解析モジュール
//!
//! - 文は `IDENT '=' expr`（定義）とそれ以外（裸の式）の 2 通り。
//! - 適用は左結合、型の `->` は右結合でハンドコードする。
//! - 空のトークン列は明示的な診断にする。空行を黙って無視しないための規則。

use crate::ast::{Statement, Term, Type};
use crate::errors::ParseError;
use crate::lexer::{Token, TokenKind};

pub struct Parser {
    ts: Vec<Token>,
    i: usize,
}

impl Parser {
    /// トークン列から新しいパーサインスタンスを構築する。
    /// EOF 番兵を欠いた列にも停止できるよう補っておく。
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EOF) {
            let pos = tokens.last().map(|t| t.pos + t.value.len()).unwrap_or(0);
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            let col = tokens.last().map(|t| t.col + t.value.len()).unwrap_or(1);
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::new(),
                pos,
                line,
                col,
            });
        }
        Self { ts: tokens, i: 0 }
    }

    fn peek(&self) -> &Token {
        &self.ts[self.i]
    }

    fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.ts.get(self.i + offset).map(|t| t.kind)
    }

    fn pop_any(&mut self) -> Token {
        let t = self.ts[self.i].clone();
        self.i += 1;
        t
    }

    fn pop(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let t = self.peek().clone();
        if t.kind != kind {
            return Err(ParseError::at(
                "PAR002",
                format!("{:?} を期待しましたが {:?} ({})", kind, t.kind, t.value),
                Some(t.pos),
                Some(t.line),
                Some(t.col),
            ));
        }
        self.i += 1;
        Ok(t)
    }

    /// 文全体を解析する。残余トークンがあればエラー。
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let head = self.peek().clone();
        if head.kind == TokenKind::EOF {
            return Err(ParseError::at(
                "PAR001",
                "文がありません（入力が空です）",
                Some(head.pos),
                Some(head.line),
                Some(head.col),
            ));
        }
        // `IDENT '='` の並びだけが定義。それ以外は裸の式として読む。
        let stmt = if head.kind == TokenKind::VARID && self.peek_kind(1) == Some(TokenKind::EQUAL) {
            let name = self.pop_any().value;
            self.pop(TokenKind::EQUAL)?;
            let expr = self.parse_expr()?;
            Statement::NamedDefinition { name, expr }
        } else {
            let expr = self.parse_expr()?;
            Statement::BareExpression { expr }
        };
        self.expect_eof()?;
        Ok(stmt)
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        let t = self.peek();
        if t.kind != TokenKind::EOF {
            return Err(ParseError::at(
                "PAR090",
                "余分なトークンが残っています",
                Some(t.pos),
                Some(t.line),
                Some(t.col),
            ));
        }
        Ok(())
    }

    fn parse_expr(&mut self) -> Result<Term, ParseError> {
        match self.peek().kind {
            TokenKind::LAMBDA => self.parse_abs(),
            TokenKind::IF => self.parse_if(),
            _ => self.parse_app(),
        }
    }

    fn parse_abs(&mut self) -> Result<Term, ParseError> {
        self.pop(TokenKind::LAMBDA)?;
        let param = self.pop(TokenKind::VARID)?.value;
        self.pop(TokenKind::COLON)?;
        let param_ty = self.parse_type()?;
        self.pop(TokenKind::DOT)?;
        // 本体は後続全体へ最長で伸びる
        let body = self.parse_expr()?;
        Ok(Term::Abs {
            param,
            param_ty,
            body: Box::new(body),
        })
    }

    fn parse_if(&mut self) -> Result<Term, ParseError> {
        self.pop(TokenKind::IF)?;
        let cond = self.parse_expr()?;
        self.pop(TokenKind::THEN)?;
        let then_branch = self.parse_expr()?;
        self.pop(TokenKind::ELSE)?;
        let else_branch = self.parse_expr()?;
        Ok(Term::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    fn parse_app(&mut self) -> Result<Term, ParseError> {
        let mut term = self.parse_atom()?;
        while starts_atom(self.peek().kind) {
            let arg = self.parse_atom()?;
            term = Term::App {
                func: Box::new(term),
                arg: Box::new(arg),
            };
        }
        Ok(term)
    }

    fn parse_atom(&mut self) -> Result<Term, ParseError> {
        let t = self.peek().clone();
        match t.kind {
            TokenKind::VARID => {
                self.pop_any();
                Ok(Term::Var { name: t.value })
            }
            TokenKind::TRUE => {
                self.pop_any();
                Ok(Term::BoolLit { value: true })
            }
            TokenKind::FALSE => {
                self.pop_any();
                Ok(Term::BoolLit { value: false })
            }
            TokenKind::LPAREN => {
                self.pop_any();
                let e = self.parse_expr()?;
                self.pop(TokenKind::RPAREN)?;
                Ok(e)
            }
            _ => Err(ParseError::at(
                "PAR010",
                format!("式の先頭として解釈できません: {:?} ({})", t.kind, t.value),
                Some(t.pos),
                Some(t.line),
                Some(t.col),
            )),
        }
    }

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let lhs = self.parse_atype()?;
        if self.peek().kind == TokenKind::ARROW {
            self.pop_any();
            // 右結合なので再帰で右へ畳む
            let rhs = self.parse_type()?;
            return Ok(Type::Fun {
                arg: Box::new(lhs),
                ret: Box::new(rhs),
            });
        }
        Ok(lhs)
    }

    fn parse_atype(&mut self) -> Result<Type, ParseError> {
        let t = self.peek().clone();
        match t.kind {
            TokenKind::CONID if t.value == "Bool" => {
                self.pop_any();
                Ok(Type::Bool)
            }
            TokenKind::CONID => Err(ParseError::at(
                "PAR020",
                format!("未知の型コンストラクタです: {}", t.value),
                Some(t.pos),
                Some(t.line),
                Some(t.col),
            )),
            TokenKind::LPAREN => {
                self.pop_any();
                let ty = self.parse_type()?;
                self.pop(TokenKind::RPAREN)?;
                Ok(ty)
            }
            _ => Err(ParseError::at(
                "PAR021",
                format!("型を期待しましたが {:?} ({})", t.kind, t.value),
                Some(t.pos),
                Some(t.line),
                Some(t.col),
            )),
        }
    }
}

/// トークンが原子式を開始できるかどうか。適用の継続判定に使う。
fn starts_atom(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::VARID | TokenKind::TRUE | TokenKind::FALSE | TokenKind::LPAREN
    )
}

/// トークン列を 1 つの文として解析する。
pub fn parse(tokens: Vec<Token>) -> Result<Statement, ParseError> {
    Parser::new(tokens).parse_statement()
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::ast::{Statement, Term, Type};
    use crate::lexer::tokenize;

    fn parse_str(src: &str) -> Statement {
        parse(tokenize(src).unwrap()).unwrap()
    }

    #[test]
    /// `IDENT '='` の並びだけが定義として分類されることを確認する。
    fn statement_classification() {
        match parse_str("id = \\x:Bool. x") {
            Statement::NamedDefinition { name, .. } => assert_eq!(name, "id"),
            other => panic!("expected definition, got {:?}", other),
        }
        assert!(matches!(
            parse_str("true"),
            Statement::BareExpression { .. }
        ));
        // 括弧で始まれば `=` が続いても裸の式（適用の途中で構文エラー）
        assert!(parse(tokenize("(x) = true").unwrap()).is_err());
    }

    #[test]
    /// 適用が左結合に畳まれることを確認する。
    fn application_is_left_associative() {
        let stmt = parse_str("f x y");
        let Statement::BareExpression { expr } = stmt else {
            panic!("expected bare expression");
        };
        match expr {
            Term::App { func, arg } => {
                assert!(matches!(*arg, Term::Var { ref name } if name == "y"));
                assert!(matches!(*func, Term::App { .. }));
            }
            other => panic!("expected application, got {:?}", other),
        }
    }

    #[test]
    /// 型注釈の `->` が右結合で解釈されることを確認する。
    fn arrow_is_right_associative() {
        let stmt = parse_str("\\f:Bool -> Bool -> Bool. f");
        let Statement::BareExpression { expr } = stmt else {
            panic!("expected bare expression");
        };
        let Term::Abs { param_ty, .. } = expr else {
            panic!("expected abstraction");
        };
        // Bool -> (Bool -> Bool)
        match param_ty {
            Type::Fun { arg, ret } => {
                assert_eq!(*arg, Type::Bool);
                assert!(matches!(*ret, Type::Fun { .. }));
            }
            other => panic!("expected function type, got {:?}", other),
        }
    }

    #[test]
    /// 空入力と残余トークンがそれぞれ診断になることを確認する。
    fn empty_and_trailing_inputs_fail() {
        let empty = parse(tokenize("").unwrap()).unwrap_err();
        assert!(format!("{}", empty).contains("PAR001"));

        let trailing = parse(tokenize("true )").unwrap()).unwrap_err();
        assert!(format!("{}", trailing).contains("PAR090"));
    }
}
