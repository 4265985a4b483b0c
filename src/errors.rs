//! エラー型の定義（共通フォーマット: \[CODE\] メッセージ @line:col / @pos）。

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub msg: String,
    pub pos: Option<usize>,  // バイトオフセット（任意）
    pub line: Option<usize>, // 1-origin（任意）
    pub col: Option<usize>,  // 1-origin（任意）
}

impl ErrorInfo {
    pub fn new(code: &'static str, msg: impl Into<String>, pos: Option<usize>) -> Self {
        Self {
            code,
            msg: msg.into(),
            pos,
            line: None,
            col: None,
        }
    }

    pub fn at(
        code: &'static str,
        msg: impl Into<String>,
        pos: Option<usize>,
        line: Option<usize>,
        col: Option<usize>,
    ) -> Self {
        Self {
            code,
            msg: msg.into(),
            pos,
            line,
            col,
        }
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (self.line, self.col, self.pos) {
            (Some(l), Some(c), Some(p)) => write!(
                f,
                "[{}] {} @line={},col={} @pos={}",
                self.code, self.msg, l, c, p
            ),
            (Some(l), Some(c), None) => {
                write!(f, "[{}] {} @line={},col={}", self.code, self.msg, l, c)
            }
            (_, _, Some(p)) => write!(f, "[{}] {} @pos={}", self.code, self.msg, p),
            _ => write!(f, "[{}] {}", self.code, self.msg),
        }
    }
}

// 段階別エラーは ErrorInfo の薄い newtype。形が同じなのでマクロでまとめる。
macro_rules! stage_error {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(pub ErrorInfo);

        impl $name {
            pub fn new(code: &'static str, msg: impl Into<String>, pos: Option<usize>) -> Self {
                Self(ErrorInfo::new(code, msg, pos))
            }

            pub fn at(
                code: &'static str,
                msg: impl Into<String>,
                pos: Option<usize>,
                line: Option<usize>,
                col: Option<usize>,
            ) -> Self {
                Self(ErrorInfo::at(code, msg, pos, line, col))
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                Display::fmt(&self.0, f)
            }
        }

        impl StdError for $name {}
    };
}

stage_error!(
    /// 字句解析段階の失敗。
    LexerError
);
stage_error!(
    /// 構文解析段階の失敗。
    ParseError
);
stage_error!(
    /// 型検査段階の失敗。
    TypeError
);
stage_error!(
    /// 評価段階の失敗（well-typed な閉じた項では起きない防衛用）。
    EvalError
);
