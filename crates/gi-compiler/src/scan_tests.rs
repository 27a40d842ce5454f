//! Unit tests for the lexical scanner.

use crate::scan::{TokenKind, scan, unscan};

#[test]
fn identifiers() {
    let mut cur = "foo_1 bar";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Id);
    assert_eq!(t.text, "foo_1");
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Id);
    assert_eq!(t.text, "bar");
    assert!(cur.is_empty());
}

#[test]
fn decimal_int() {
    let mut cur = "42";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Int);
    assert_eq!(t.num, 42);
}

#[test]
fn octal_int() {
    let mut cur = "017";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Int);
    assert_eq!(t.num, 0o17);
}

#[test]
fn hex_int() {
    let mut cur = "0x1A";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Int);
    assert_eq!(t.num, 0x1A);
}

#[test]
fn exponent_int_truncates_from_float() {
    let mut cur = "1e3";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Int);
    assert_eq!(t.num, 1000);
}

#[test]
fn floats() {
    let mut cur = "3.25 1.5e2";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Float);
    assert_eq!(t.fnum, 3.25);
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Float);
    assert_eq!(t.fnum, 150.0);
}

#[test]
fn plain_string() {
    let mut cur = "\"hi\" x";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Str);
    assert_eq!(t.text, "hi");
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Id);
    assert_eq!(t.text, "x");
}

#[test]
fn escaped_string_is_bstr() {
    let mut cur = r#""a\"b""#;
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Bstr);
    assert_eq!(t.text, r#"a\"b"#);
}

#[test]
fn unterminated_string_is_bad() {
    let mut cur = "\"abc";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Bad);
}

#[test]
fn blocks_keep_inner_body() {
    let mut cur = "(1 + (2))";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Paren);
    assert_eq!(t.text, "1 + (2)");

    let mut cur = "{ a }";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Brace);
    assert_eq!(t.text, " a ");

    let mut cur = "[x]";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Bracket);
    assert_eq!(t.text, "x");
}

#[test]
fn block_honors_quoted_delimiters() {
    let mut cur = "(\")\")";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Paren);
    assert_eq!(t.text, "\")\"");
}

#[test]
fn unbalanced_block_is_bad() {
    let mut cur = "(a";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Bad);
}

#[test]
fn comment_runs_to_end_of_line() {
    let mut cur = "# hi\nx";
    let t = scan(&mut cur);
    // the comment is whitespace; the newline is the first token
    assert_eq!(t.kind, TokenKind::Csep);
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Id);
    assert_eq!(t.text, "x");
}

#[test]
fn separator_run_is_one_token() {
    let mut cur = ";; \n ;x";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Csep);
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Id);
    assert_eq!(t.text, "x");
}

#[test]
fn list_separator() {
    let mut cur = ",";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Lsep);
}

#[test]
fn two_char_operators() {
    for op in ["!=", "==", "<=", "<<", ">=", ">>", "&&", "||", "++", "--", ":="] {
        let mut cur = op;
        let t = scan(&mut cur);
        assert_eq!(t.kind, TokenKind::Oper, "{op}");
        assert_eq!(t.text, op);
        assert!(cur.is_empty(), "{op}");
    }
}

#[test]
fn single_char_operators() {
    for op in ["+", "-", "*", "/", "%", "^", "~", "<", ">", "=", "!", "&", "|", ".", "@", "?"] {
        let mut cur = op;
        let t = scan(&mut cur);
        assert_eq!(t.kind, TokenKind::Oper, "{op}");
        assert_eq!(t.text, op);
    }
}

#[test]
fn unknown_byte_is_bad() {
    let mut cur = ")";
    let t = scan(&mut cur);
    assert_eq!(t.kind, TokenKind::Bad);
    assert!(cur.is_empty());
}

#[test]
fn unscan_then_scan_is_identity() {
    let src = "a + b";
    let mut cur = src;
    let t1 = scan(&mut cur);
    unscan(&mut cur, &t1);
    assert_eq!(cur, src);
    let t2 = scan(&mut cur);
    assert_eq!(t2.kind, t1.kind);
    assert_eq!(t2.text, t1.text);
}

#[test]
fn every_leading_byte_terminates() {
    for b in 0u16..=255 {
        let s = format!("{}x 1", b as u8 as char);
        let mut cur = s.as_str();
        let mut guard = 0;
        while !cur.is_empty() {
            let before = cur.len();
            let _ = scan(&mut cur);
            assert!(cur.len() < before || cur.is_empty(), "no progress on byte {b}");
            guard += 1;
            assert!(guard < 16, "runaway scan on byte {b}");
        }
    }
}

#[test]
fn consumed_prefix_accounts_for_whole_input() {
    let src = "a := 10 # trailing\nprintln(a)";
    let mut cur = src;
    let mut consumed = 0usize;
    while !cur.is_empty() {
        let before = cur.len();
        let _ = scan(&mut cur);
        consumed += before - cur.len();
    }
    assert_eq!(consumed, src.len());
}
