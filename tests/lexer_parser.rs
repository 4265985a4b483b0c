// パス: tests/lexer_parser.rs
// 役割: 字句解析と構文解析の境界をまとめて検証する統合テスト
// 意図: トークンの位置情報と文の分類が仕様どおりであることを保証する
// 関連ファイル: src/lexer.rs, src/parser.rs, tests/test_support.rs
#[path = "test_support.rs"]
mod support;

use support::{parse_stmt, parse_term};
use stlc::ast::{Statement, Term, Type};
use stlc::lexer::{tokenize, TokenKind};
use stlc::parser::parse;

#[test]
/// 代表的な入力のトークン分類を確認する。
fn tokenize_classifies_symbols_keywords_and_idents() {
    let tokens = tokenize("\\x:Bool. if x then true else f x").unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::LAMBDA,
            TokenKind::VARID,
            TokenKind::COLON,
            TokenKind::CONID,
            TokenKind::DOT,
            TokenKind::IF,
            TokenKind::VARID,
            TokenKind::THEN,
            TokenKind::TRUE,
            TokenKind::ELSE,
            TokenKind::VARID,
            TokenKind::VARID,
            TokenKind::EOF,
        ]
    );
}

#[test]
/// トークンが 1-origin の行・列とバイト位置を持つことを確認する。
fn tokenize_records_positions() {
    let tokens = tokenize("id = true").unwrap();
    let id = &tokens[0];
    assert_eq!((id.pos, id.line, id.col), (0, 1, 1));
    let eq = &tokens[1];
    assert_eq!((eq.pos, eq.line, eq.col), (3, 1, 4));
    let tru = &tokens[2];
    assert_eq!((tru.pos, tru.line, tru.col), (5, 1, 6));
}

#[test]
/// `--` コメントが行末まで読み飛ばされることを確認する。
fn tokenize_skips_line_comments() {
    let tokens = tokenize("true -- これはコメント").unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::TRUE, TokenKind::EOF]);
}

#[test]
/// 未知の文字と欠けた矢印が位置付き診断になることを確認する。
fn tokenize_reports_positioned_errors() {
    let unknown = tokenize("true ?").unwrap_err();
    let msg = format!("{}", unknown);
    assert!(msg.contains("LEX101"));
    assert!(msg.contains("@line=1,col=6"));

    let half_arrow = tokenize("\\x:Bool - Bool. x").unwrap_err();
    assert!(format!("{}", half_arrow).contains("LEX102"));
}

#[test]
/// プライム付き識別子が 1 トークンとして読めることを確認する。
fn tokenize_accepts_primed_identifiers() {
    let tokens = tokenize("x' = true").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::VARID);
    assert_eq!(tokens[0].value, "x'");
}

#[test]
/// 定義と裸の式が正しく分類されることを確認する。
fn parse_classifies_statements() {
    match parse_stmt("not = \\b:Bool. if b then false else true") {
        Statement::NamedDefinition { name, expr } => {
            assert_eq!(name, "not");
            assert!(matches!(expr, Term::Abs { .. }));
        }
        other => panic!("expected definition, got {:?}", other),
    }
    assert!(matches!(
        parse_stmt("(\\x:Bool. x) true"),
        Statement::BareExpression { .. }
    ));
}

#[test]
/// ラムダ本体が後続全体へ最長で伸びることを確認する。
fn lambda_body_extends_to_the_right() {
    let term = parse_term("\\x:Bool. x x");
    let Term::Abs { body, .. } = term else {
        panic!("expected abstraction");
    };
    assert!(matches!(*body, Term::App { .. }));
}

#[test]
/// 型注釈の括弧が結合を変えることを確認する。
fn parenthesized_types_change_association() {
    let term = parse_term("\\f:(Bool -> Bool) -> Bool. f");
    let Term::Abs { param_ty, .. } = term else {
        panic!("expected abstraction");
    };
    let Type::Fun { arg, ret } = param_ty else {
        panic!("expected function type");
    };
    assert!(matches!(*arg, Type::Fun { .. }));
    assert_eq!(*ret, Type::Bool);
}

#[test]
/// 不完全な入力が段階に応じた構文診断になることを確認する。
fn parse_reports_incomplete_inputs() {
    let missing_body = parse(tokenize("\\x:Bool.").unwrap()).unwrap_err();
    assert!(format!("{}", missing_body).contains("PAR010"));

    let missing_colon = parse(tokenize("\\x. x").unwrap()).unwrap_err();
    assert!(format!("{}", missing_colon).contains("PAR002"));

    let unknown_tycon = parse(tokenize("\\x:Nat. x").unwrap()).unwrap_err();
    assert!(format!("{}", unknown_tycon).contains("PAR020"));

    let unclosed = parse(tokenize("(true").unwrap()).unwrap_err();
    assert!(format!("{}", unclosed).contains("PAR002"));
}

#[test]
/// 解析結果の表示が読み戻せる具象構文に近いことを確認する。
fn display_round_trips_surface_syntax() {
    let term = parse_term("\\x:Bool -> Bool. if true then x else \\y:Bool. y");
    assert_eq!(
        format!("{}", term),
        "\\x:Bool -> Bool. if true then x else \\y:Bool. y"
    );
}
