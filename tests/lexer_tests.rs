// tests/lexer_tests.rs

use jsonmacro::lexer::{Lexer, RESERVED_WORDS, is_identifier_part, is_identifier_start, is_reserved};

#[test]
fn test_whitespace_is_skipped() {
    let mut lexer = Lexer::new(" \t\r\n  x");
    lexer.skip_whitespace();
    assert_eq!(lexer.current_char(), Some('x'));
    assert_eq!(lexer.position(), 6);
}

#[test]
fn test_identifier_characters() {
    for ch in ['a', 'Z', '$', '_'] {
        assert!(is_identifier_start(ch), "{ch}");
        assert!(is_identifier_part(ch), "{ch}");
    }
    assert!(!is_identifier_start('1'));
    assert!(is_identifier_part('1'));
    assert!(!is_identifier_part('.'));
    assert!(!is_identifier_part('é'));
}

#[test]
fn test_every_reserved_word_is_refused() {
    for word in RESERVED_WORDS {
        assert!(is_reserved(word));
        let mut lexer = Lexer::new(word);
        assert_eq!(lexer.read_identifier(), None, "{word}");
        assert_eq!(lexer.position(), 0);

        // A longer word starting with the keyword is fine
        let longer = format!("{word}Thing");
        let mut lexer = Lexer::new(&longer);
        assert_eq!(lexer.read_identifier(), Some(longer.clone()));
    }
}

#[test]
fn test_identifier_stops_at_non_identifier_character() {
    let mut lexer = Lexer::new("myVar.myProp");
    assert_eq!(lexer.read_identifier(), Some("myVar".to_string()));
    assert!(lexer.eat_char('.'));
    assert_eq!(lexer.read_identifier(), Some("myProp".to_string()));
    assert!(lexer.is_at_end());
}

#[test]
fn test_strings_are_verbatim() {
    let mut lexer = Lexer::new(r#""a\b 'c'" rest"#);
    assert_eq!(lexer.read_string(), Some(r"a\b 'c'".to_string()));
    assert_eq!(lexer.current_char(), Some(' '));

    let mut lexer = Lexer::new("'single'");
    assert_eq!(lexer.read_string(), None);
}

#[test]
fn test_number_forms() {
    let cases = [
        ("0", 0.0),
        ("8.23", 8.23),
        ("-2.34", -2.34),
        ("+.5", 0.5),
        ("3.", 3.0),
    ];
    for (input, expected) in cases {
        let mut lexer = Lexer::new(input);
        assert_eq!(lexer.read_number(), Some(expected), "input: {input}");
    }

    for input in ["-", ".", "+-2", "-.", "x1"] {
        let mut lexer = Lexer::new(input);
        assert_eq!(lexer.read_number(), None, "input: {input}");
        assert_eq!(lexer.position(), 0, "input: {input}");
    }
}

#[test]
fn test_number_overflowing_to_infinity_is_rejected() {
    let input = "9".repeat(400);
    let mut lexer = Lexer::new(&input);
    assert_eq!(lexer.read_number(), None);
    assert_eq!(lexer.position(), 0);
    assert_eq!(lexer.error().offset, 0);
    assert_eq!(lexer.error().expected, vec!["number".to_string()]);
}

#[test]
fn test_number_stops_before_operator() {
    let mut lexer = Lexer::new("1-2");
    assert_eq!(lexer.read_number(), Some(1.0));
    assert!(lexer.eat_symbol("-"));
    assert_eq!(lexer.read_number(), Some(2.0));
}

#[test]
fn test_symbols() {
    let mut lexer = Lexer::new("<=");
    assert!(!lexer.eat_symbol(">="));
    assert!(lexer.eat_symbol("<="));
    assert!(lexer.is_at_end());
}

#[test]
fn test_error_collects_every_expectation_at_the_furthest_offset() {
    let mut lexer = Lexer::new("a ?");
    assert!(lexer.read_identifier().is_some());
    lexer.skip_whitespace();
    assert!(!lexer.eat_symbol("=="));
    assert!(!lexer.eat_keyword("and"));

    let error = lexer.error();
    assert_eq!(error.offset, 2);
    assert_eq!(error.column, 3);
    assert_eq!(error.found, Some('?'));
    assert_eq!(error.expected, vec!["\"==\"".to_string(), "\"and\"".to_string()]);
    assert_eq!(error.to_string(), "expected \"==\" or \"and\" but '?' found at line 1, column 3");
}

#[test]
fn test_rewinding_does_not_forget_the_furthest_failure() {
    let mut lexer = Lexer::new("abc def");
    lexer.reset(4);
    assert!(!lexer.eat_char('('));
    lexer.reset(0);
    assert!(!lexer.eat_char('('));

    assert_eq!(lexer.error().offset, 4);
    assert_eq!(lexer.error().expected, vec!["\"(\"".to_string()]);
}
