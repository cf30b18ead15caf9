use expr_interpreter::{CalcError, Diagnostic, Lexer, Session, Token, execute, execute_file};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn value_of(program: &str, name: &str) -> Option<f64> {
        execute(program).variables.get(name)
    }

    #[test]
    fn test_simple_program() {
        let result = execute("x = 5;");
        assert_eq!(result.variables.get("x"), Some(5.0));
        assert_eq!(result.outcomes.len(), 1);
        assert_eq!(result.diagnostics().count(), 0);
    }

    #[test]
    fn test_arithmetic_operations() {
        let program = "a = 10; b = 4; sum = a + b; diff = a - b; prod = a * b; quot = a / b;";
        let result = execute(program);
        assert_eq!(result.variables.get("sum"), Some(14.0));
        assert_eq!(result.variables.get("diff"), Some(6.0));
        assert_eq!(result.variables.get("prod"), Some(40.0));
        assert_eq!(result.variables.get("quot"), Some(2.5));
    }

    #[test]
    fn test_expression_precedence() {
        assert_eq!(value_of("x = 2 + 3 * 4;", "x"), Some(14.0));
        assert_eq!(value_of("x = 2 * 3 + 4;", "x"), Some(10.0));
        assert_eq!(value_of("x = 10 - 5 + 3 * 2 / 2;", "x"), Some(8.0));
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(value_of("x = 10 - 3 - 2;", "x"), Some(5.0));
        assert_eq!(value_of("x = 64 / 4 / 2;", "x"), Some(8.0));
        assert_eq!(value_of("x = 1 + 2 + 3 + 4 + 5;", "x"), Some(15.0));
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(value_of("x = --5;", "x"), Some(5.0));
        assert_eq!(value_of("x = +-5;", "x"), Some(-5.0));
        assert_eq!(value_of("x = 7; y = - -x;", "y"), Some(7.0));
        assert_eq!(value_of("x = 3 - -2;", "x"), Some(5.0));
    }

    #[test]
    fn test_variable_reuse() {
        let result = execute("a = 5; b = a + 1; a = 10; c = a + 1;");
        assert_eq!(result.variables.get("b"), Some(6.0));
        assert_eq!(result.variables.get("a"), Some(10.0));
        assert_eq!(result.variables.get("c"), Some(11.0));
    }

    #[test]
    fn test_self_reference() {
        assert_eq!(value_of("x = 5; x = x + 1; x = x * 2;", "x"), Some(12.0));
    }

    #[test]
    fn test_undefined_variable() {
        let result = execute("c = unknown + 1;");
        assert_eq!(result.variables.get("c"), Some(1.0));
        assert_eq!(
            result.outcomes[0].diagnostics,
            vec![Diagnostic::UndefinedVariable("unknown".to_string())]
        );
        assert_eq!(result.variables.get("unknown"), None);
    }

    #[test]
    fn test_number_followed_by_identifier() {
        let result = execute("d = 12abc;");
        assert_eq!(result.variables.get("d"), Some(12.0));
        assert_eq!(
            result.outcomes[0].diagnostics,
            vec![Diagnostic::UnexpectedToken(Token::Identifier("abc".to_string()))]
        );
    }

    #[test]
    fn test_end_of_input_mid_expression() {
        let result = execute("e = 1 +");
        assert_eq!(result.variables.get("e"), Some(-1.0));
        assert_eq!(result.outcomes[0].diagnostics, vec![Diagnostic::UnexpectedEndOfInput]);
    }

    #[test]
    fn test_missing_final_semicolon() {
        assert_eq!(value_of("x = 1; y = x + 1", "y"), Some(2.0));
    }

    #[test]
    fn test_division_by_zero() {
        let result = execute("p = 1 / 0; n = -1 / 0; z = 0 / 0;");
        assert_eq!(result.variables.get("p"), Some(f64::INFINITY));
        assert_eq!(result.variables.get("n"), Some(f64::NEG_INFINITY));
        assert!(result.variables.get("z").unwrap().is_nan());
        assert_eq!(result.diagnostics().count(), 0);
    }

    #[test]
    fn test_unexpected_assignment() {
        let result = execute("x = 1 = 2; y = 3;");
        assert_eq!(result.variables.get("x"), Some(1.0));
        assert_eq!(result.variables.get("y"), Some(3.0));
        assert_eq!(
            result.outcomes[0].diagnostics,
            vec![
                Diagnostic::UnexpectedAssignment,
                Diagnostic::UnexpectedToken(Token::Number("2".to_string())),
            ]
        );
    }

    #[test]
    fn test_unrecognized_characters() {
        let result = execute("x = 2 $ + 3;");
        assert_eq!(result.variables.get("x"), Some(5.0));
        assert_eq!(
            result.outcomes[0].diagnostics,
            vec![Diagnostic::UnrecognizedCharacter('$')]
        );
    }

    #[test]
    fn test_errors_do_not_stop_later_statements() {
        let result = execute("a = b; 7 = 3; c = 2 * 2;");
        assert_eq!(result.variables.get("a"), Some(0.0));
        assert_eq!(result.variables.get("c"), Some(4.0));
        assert_eq!(result.diagnostics().count(), 2);
    }

    #[test]
    fn test_trailing_diagnostics() {
        let result = execute("x = 1; y");
        assert_eq!(result.outcomes.len(), 1);
        assert_eq!(
            result.trailing,
            vec![Diagnostic::ExpectedToken { expected: "'='", found: Token::Eof }]
        );
    }

    #[test]
    fn test_whitespace_handling() {
        let result = execute("   x   =   5   ;\n\n\t  y   =\n 10   ;   ");
        assert_eq!(result.variables.get("x"), Some(5.0));
        assert_eq!(result.variables.get("y"), Some(10.0));
    }

    #[test]
    fn test_session_steps() {
        let mut session = Session::new(Lexer::new("a = 2; b = a * a;"));
        let first = session.step().unwrap();
        assert_eq!((first.target.as_str(), first.value), ("a", 2.0));
        let second = session.step().unwrap();
        assert_eq!((second.target.as_str(), second.value), ("b", 4.0));
        assert!(session.step().is_none());
        assert!(session.step().is_none());
        assert_eq!(session.environment().len(), 2);
    }

    #[test]
    fn test_execute_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "width = 3;").unwrap();
        writeln!(file, "height = 4;").unwrap();
        writeln!(file, "area = width * height;").unwrap();
        file.flush().unwrap();

        let result = execute_file(file.path()).unwrap();
        assert_eq!(result.variables.get("area"), Some(12.0));
        assert_eq!(result.variables.sorted().len(), 3);
    }

    #[test]
    fn test_execute_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let err = execute_file(&missing).unwrap_err();
        assert!(matches!(err, CalcError::Read { .. }));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_invalid_utf8_in_file_does_not_stop_later_statements() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"a = 1;\nq = 2 \xff;\nb = 2;\n").unwrap();
        file.flush().unwrap();

        let result = execute_file(file.path()).unwrap();
        assert_eq!(result.variables.get("a"), Some(1.0));
        assert_eq!(result.variables.get("q"), Some(2.0));
        assert_eq!(result.variables.get("b"), Some(2.0));
        assert_eq!(
            result.outcomes[1].diagnostics,
            vec![Diagnostic::UnrecognizedCharacter(char::REPLACEMENT_CHARACTER)]
        );
    }

    #[test]
    fn test_long_sign_chains() {
        let even = execute(&format!("x = {}5;", "-".repeat(100_000)));
        assert_eq!(even.variables.get("x"), Some(5.0));
        let odd = execute(&format!("x = {}5;", "-".repeat(100_001)));
        assert_eq!(odd.variables.get("x"), Some(-5.0));
    }

    #[test]
    fn test_long_operator_chain() {
        let program = format!("x = {}1;", "1 + ".repeat(100_000));
        let result = execute(&program);
        assert_eq!(result.variables.get("x"), Some(100_001.0));
        assert_eq!(result.diagnostics().count(), 0);
    }
}
