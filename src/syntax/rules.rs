//! The Ember grammar.
//!
//! Productions are registered lowest-precedence first; the operator
//! ladder runs Or → And → Not → Cmp → Concat → Add → Mul → Pow →
//! Unary → Postfix → Atom. Every builder folds its children into an
//! [`Ast`] node; transient `Token`/`List` values never survive into a
//! finished tree.

use smol_str::SmolStr;

use crate::grammar::Grammar;
use crate::lexer::{Token, TokenKind};

use super::ast::{ArithmeticOp, Ast, BooleanOp, ConstantKind, StringOp};

/// Map a token to its grammar terminal: literal categories collapse to
/// `num`/`str`/`bool`/`id`, keywords and punctuation spell themselves.
pub fn ember_terminal_of(token: &Token) -> SmolStr {
    match token.kind {
        TokenKind::Identifier => SmolStr::new("id"),
        TokenKind::Number => SmolStr::new("num"),
        TokenKind::String => SmolStr::new("str"),
        TokenKind::Boolean => SmolStr::new("bool"),
        _ => token.value.clone(),
    }
}

fn leaf(token: &Token) -> Ast {
    Ast::Token(token.clone())
}

/// Take the value at `index`, leaving a placeholder behind.
fn take(values: &mut Vec<Ast>, index: usize) -> Ast {
    std::mem::replace(&mut values[index], Ast::List(Vec::new()))
}

fn tok(value: Ast) -> Token {
    match value {
        Ast::Token(token) => token,
        other => Token::new(TokenKind::Symbol, "", other.position()),
    }
}

fn list(value: Ast) -> Vec<Ast> {
    match value {
        Ast::List(items) => items,
        other => vec![other],
    }
}

fn pass(mut values: Vec<Ast>) -> Ast {
    values.pop().unwrap_or(Ast::List(Vec::new()))
}

fn empty_list(_values: Vec<Ast>) -> Ast {
    Ast::List(Vec::new())
}

fn single(mut values: Vec<Ast>) -> Ast {
    Ast::List(vec![values.pop().unwrap_or(Ast::List(Vec::new()))])
}

/// `List item` or `List sep item`: push the last value onto the first.
fn append(mut values: Vec<Ast>) -> Ast {
    let last = values.len() - 1;
    let item = take(&mut values, last);
    match take(&mut values, 0) {
        Ast::List(mut items) => {
            items.push(item);
            Ast::List(items)
        }
        first => Ast::List(vec![first, item]),
    }
}

fn arith(mut values: Vec<Ast>, op: ArithmeticOp) -> Ast {
    Ast::ArithmeticBinary {
        op,
        left: Box::new(take(&mut values, 0)),
        right: Box::new(take(&mut values, 2)),
    }
}

fn boolean(mut values: Vec<Ast>, op: BooleanOp) -> Ast {
    Ast::BooleanBinary {
        op,
        left: Box::new(take(&mut values, 0)),
        right: Box::new(take(&mut values, 2)),
    }
}

fn stringy(mut values: Vec<Ast>, op: StringOp) -> Ast {
    Ast::StringBinary {
        op,
        left: Box::new(take(&mut values, 0)),
        right: Box::new(take(&mut values, 2)),
    }
}

fn constant(mut values: Vec<Ast>, kind: ConstantKind) -> Ast {
    Ast::Constant {
        kind,
        value: tok(take(&mut values, 0)),
    }
}

fn class_function(values: &mut Vec<Ast>, body_at: usize) -> Ast {
    Ast::ClassFunction {
        name: tok(take(values, 0)),
        parameters: list(take(values, 2)),
        return_type: Box::new(take(values, 4)),
        body: Box::new(take(values, body_at)),
    }
}

fn function_declaration(values: &mut Vec<Ast>, body_at: usize) -> Ast {
    Ast::FunctionDeclaration {
        name: tok(take(values, 1)),
        parameters: list(take(values, 3)),
        return_type: Box::new(take(values, 5)),
        body: Box::new(take(values, body_at)),
    }
}

/// Build the Ember grammar.
pub fn ember_grammar() -> Grammar<Ast> {
    let mut g: Grammar<Ast> = Grammar::new("ember", "Program", leaf);

    g.terminals(&[
        "function", "type", "inherits", "protocol", "extends", "new", "is", "as", "let",
        "in", "if", "elif", "else", "while", "for", "{", "}", "(", ")", "[", "]", "||",
        ",", ";", ":=", ":", ".", "=>", "==", "=", "!=", "!", "<=", "<", ">=", ">", "+",
        "-", "*", "/", "%", "^", "@@", "@", "&", "|", "id", "num", "str", "bool",
    ]);

    // ------------------------------------------------------------------
    // Program and declarations
    // ------------------------------------------------------------------
    fn program(mut values: Vec<Ast>) -> Ast {
        let declarations = list(take(&mut values, 0));
        let expression = take(&mut values, 1);
        let mut types = Vec::new();
        let mut functions = Vec::new();
        for declaration in declarations {
            match declaration {
                Ast::FunctionDeclaration { .. } => functions.push(declaration),
                other => types.push(other),
            }
        }
        Ast::Program {
            types,
            functions,
            expression: Box::new(expression),
        }
    }
    g.rule("Program", &["Decls", "Expr"], program);
    g.rule("Program", &["Decls", "Expr", ";"], program);

    g.rule("Decls", &["Decls", "Decl"], append);
    g.rule("Decls", &[], empty_list);
    g.rule("Decl", &["FunctionDecl"], pass);
    g.rule("Decl", &["ClassDecl"], pass);
    g.rule("Decl", &["ProtocolDecl"], pass);

    g.rule(
        "FunctionDecl",
        &["function", "id", "(", "Params", ")", "TypeAnn", "=>", "Expr", ";"],
        |mut values| function_declaration(&mut values, 7),
    );
    g.rule(
        "FunctionDecl",
        &["function", "id", "(", "Params", ")", "TypeAnn", "Block"],
        |mut values| function_declaration(&mut values, 6),
    );

    g.rule("Params", &[], empty_list);
    g.rule("Params", &["ParamList"], pass);
    g.rule("ParamList", &["Param"], single);
    g.rule("ParamList", &["ParamList", ",", "Param"], append);
    g.rule("Param", &["id", "TypeAnn"], |mut values| Ast::Parameter {
        name: tok(take(&mut values, 0)),
        annotation: Box::new(take(&mut values, 1)),
    });

    g.rule("TypeAnn", &[":", "TypeRef"], |mut values| {
        take(&mut values, 1)
    });
    g.rule("TypeAnn", &[], |_values| Ast::NoType);
    g.rule("TypeRef", &["id"], |mut values| Ast::Type {
        name: tok(take(&mut values, 0)),
    });
    g.rule("TypeRef", &["[", "id", "]"], |mut values| Ast::VectorType {
        name: tok(take(&mut values, 1)),
    });

    g.rule(
        "ClassDecl",
        &["type", "ClassHead", "Inherit", "{", "ClassBody", "}"],
        |mut values| Ast::ClassDeclaration {
            class_type: Box::new(take(&mut values, 1)),
            inheritance: Box::new(take(&mut values, 2)),
            body: list(take(&mut values, 4)),
        },
    );
    g.rule("ClassHead", &["id"], |mut values| Ast::ClassType {
        name: tok(take(&mut values, 0)),
    });
    g.rule(
        "ClassHead",
        &["id", "(", "Params", ")"],
        |mut values| Ast::ClassTypeParameter {
            name: tok(take(&mut values, 0)),
            parameters: list(take(&mut values, 2)),
        },
    );
    g.rule("Inherit", &["inherits", "id"], |mut values| {
        Ast::Inheritance {
            name: tok(take(&mut values, 1)),
        }
    });
    g.rule(
        "Inherit",
        &["inherits", "id", "(", "Args", ")"],
        |mut values| Ast::InheritanceParameter {
            name: tok(take(&mut values, 1)),
            arguments: list(take(&mut values, 3)),
        },
    );
    g.rule("Inherit", &[], |_values| Ast::NoInheritance);

    g.rule("ClassBody", &["ClassBody", "ClassMember"], append);
    g.rule("ClassBody", &[], empty_list);
    g.rule(
        "ClassMember",
        &["id", "TypeAnn", "=", "Expr", ";"],
        |mut values| Ast::ClassProperty {
            name: tok(take(&mut values, 0)),
            annotation: Box::new(take(&mut values, 1)),
            expression: Box::new(take(&mut values, 3)),
        },
    );
    g.rule(
        "ClassMember",
        &["id", "(", "Params", ")", "TypeAnn", "=>", "Expr", ";"],
        |mut values| class_function(&mut values, 6),
    );
    g.rule(
        "ClassMember",
        &["id", "(", "Params", ")", "TypeAnn", "Block"],
        |mut values| class_function(&mut values, 5),
    );

    g.rule(
        "ProtocolDecl",
        &["protocol", "id", "Extends", "{", "ProtocolBody", "}"],
        |mut values| Ast::ProtocolDeclaration {
            protocol_type: Box::new(Ast::ProtocolType {
                name: tok(take(&mut values, 1)),
            }),
            extension: Box::new(take(&mut values, 2)),
            body: list(take(&mut values, 4)),
        },
    );
    g.rule("Extends", &["extends", "id"], |mut values| Ast::Extension {
        name: tok(take(&mut values, 1)),
    });
    g.rule("Extends", &[], |_values| Ast::NoExtension);
    g.rule("ProtocolBody", &["ProtocolBody", "ProtocolMember"], append);
    g.rule("ProtocolBody", &[], empty_list);
    g.rule(
        "ProtocolMember",
        &["id", "(", "Params", ")", ":", "TypeRef", ";"],
        |mut values| Ast::ProtocolFunction {
            name: tok(take(&mut values, 0)),
            parameters: list(take(&mut values, 2)),
            return_type: Box::new(take(&mut values, 5)),
        },
    );

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------
    g.rule("Expr", &["let", "Bindings", "in", "Expr"], |mut values| {
        Ast::Let {
            bindings: list(take(&mut values, 1)),
            body: Box::new(take(&mut values, 3)),
        }
    });
    g.rule("Expr", &["IfExpr"], pass);
    g.rule("Expr", &["while", "(", "Expr", ")", "Expr"], |mut values| {
        Ast::While {
            condition: Box::new(take(&mut values, 2)),
            body: Box::new(take(&mut values, 4)),
        }
    });
    g.rule(
        "Expr",
        &["for", "(", "id", "in", "Expr", ")", "Expr"],
        |mut values| Ast::For {
            variable: tok(take(&mut values, 2)),
            iterable: Box::new(take(&mut values, 4)),
            body: Box::new(take(&mut values, 6)),
        },
    );
    g.rule("Expr", &["id", ":=", "Expr"], |mut values| Ast::Assignment {
        name: tok(take(&mut values, 0)),
        value: Box::new(take(&mut values, 2)),
    });
    g.rule(
        "Expr",
        &["Postfix", ".", "id", ":=", "Expr"],
        |mut values| Ast::AssignmentProperty {
            receiver: Box::new(take(&mut values, 0)),
            property: tok(take(&mut values, 2)),
            value: Box::new(take(&mut values, 4)),
        },
    );
    g.rule(
        "Expr",
        &["Postfix", "[", "Expr", "]", ":=", "Expr"],
        |mut values| Ast::AssignmentArray {
            expression: Box::new(take(&mut values, 0)),
            indexer: Box::new(take(&mut values, 2)),
            value: Box::new(take(&mut values, 5)),
        },
    );
    g.rule("Expr", &["Or"], pass);

    g.rule(
        "IfExpr",
        &["if", "(", "Expr", ")", "Expr", "Elifs", "else", "Expr"],
        |mut values| Ast::If {
            condition: Box::new(take(&mut values, 2)),
            body: Box::new(take(&mut values, 4)),
            elifs: list(take(&mut values, 5)),
            else_body: Box::new(take(&mut values, 7)),
        },
    );
    g.rule("Elifs", &["Elifs", "Elif"], append);
    g.rule("Elifs", &[], empty_list);
    g.rule("Elif", &["elif", "(", "Expr", ")", "Expr"], |mut values| {
        Ast::Elif {
            condition: Box::new(take(&mut values, 2)),
            body: Box::new(take(&mut values, 4)),
        }
    });

    g.rule("Bindings", &["Binding"], single);
    g.rule("Bindings", &["Bindings", ",", "Binding"], append);
    g.rule(
        "Binding",
        &["id", "TypeAnn", "=", "Expr"],
        |mut values| Ast::Declaration {
            name: tok(take(&mut values, 0)),
            annotation: Box::new(take(&mut values, 1)),
            value: Box::new(take(&mut values, 3)),
        },
    );

    // Operator ladder
    g.rule("Or", &["Or", "|", "And"], |values| {
        boolean(values, BooleanOp::Or)
    });
    g.rule("Or", &["And"], pass);
    g.rule("And", &["And", "&", "Not"], |values| {
        boolean(values, BooleanOp::And)
    });
    g.rule("And", &["Not"], pass);
    g.rule("Not", &["!", "Not"], |mut values| Ast::BooleanUnary {
        op: BooleanOp::Not,
        child: Box::new(take(&mut values, 1)),
    });
    g.rule("Not", &["Cmp"], pass);

    g.rule("Cmp", &["Concat", "==", "Concat"], |values| {
        boolean(values, BooleanOp::Eq)
    });
    g.rule("Cmp", &["Concat", "!=", "Concat"], |values| {
        boolean(values, BooleanOp::Neq)
    });
    g.rule("Cmp", &["Concat", "<", "Concat"], |values| {
        boolean(values, BooleanOp::Lt)
    });
    g.rule("Cmp", &["Concat", ">", "Concat"], |values| {
        boolean(values, BooleanOp::Gt)
    });
    g.rule("Cmp", &["Concat", "<=", "Concat"], |values| {
        boolean(values, BooleanOp::Le)
    });
    g.rule("Cmp", &["Concat", ">=", "Concat"], |values| {
        boolean(values, BooleanOp::Ge)
    });
    g.rule("Cmp", &["Concat", "is", "TypeRef"], |mut values| Ast::Is {
        expression: Box::new(take(&mut values, 0)),
        target: Box::new(take(&mut values, 2)),
    });
    g.rule("Cmp", &["Concat", "as", "TypeRef"], |mut values| Ast::As {
        expression: Box::new(take(&mut values, 0)),
        target: Box::new(take(&mut values, 2)),
    });
    g.rule("Cmp", &["Concat"], pass);

    g.rule("Concat", &["Concat", "@", "Add"], |values| {
        stringy(values, StringOp::Concat)
    });
    g.rule("Concat", &["Concat", "@@", "Add"], |values| {
        stringy(values, StringOp::ConcatSpace)
    });
    g.rule("Concat", &["Add"], pass);

    g.rule("Add", &["Add", "+", "Mul"], |values| {
        arith(values, ArithmeticOp::Add)
    });
    g.rule("Add", &["Add", "-", "Mul"], |values| {
        arith(values, ArithmeticOp::Sub)
    });
    g.rule("Add", &["Mul"], pass);
    g.rule("Mul", &["Mul", "*", "Pow"], |values| {
        arith(values, ArithmeticOp::Mul)
    });
    g.rule("Mul", &["Mul", "/", "Pow"], |values| {
        arith(values, ArithmeticOp::Div)
    });
    g.rule("Mul", &["Mul", "%", "Pow"], |values| {
        arith(values, ArithmeticOp::Mod)
    });
    g.rule("Mul", &["Pow"], pass);
    g.rule("Pow", &["Unary", "^", "Pow"], |values| {
        arith(values, ArithmeticOp::Pow)
    });
    g.rule("Pow", &["Unary"], pass);
    g.rule("Unary", &["-", "Unary"], |mut values| Ast::ArithmeticUnary {
        op: ArithmeticOp::Neg,
        child: Box::new(take(&mut values, 1)),
    });
    g.rule("Unary", &["Postfix"], pass);

    // Postfix chains
    g.rule(
        "Postfix",
        &["Postfix", ".", "id", "(", "Args", ")"],
        |mut values| Ast::InstanceFunction {
            receiver: Box::new(take(&mut values, 0)),
            name: tok(take(&mut values, 2)),
            arguments: list(take(&mut values, 4)),
        },
    );
    g.rule("Postfix", &["Postfix", ".", "id"], |mut values| {
        Ast::InstanceProperty {
            receiver: Box::new(take(&mut values, 0)),
            property: tok(take(&mut values, 2)),
        }
    });
    g.rule("Postfix", &["Postfix", "[", "Expr", "]"], |mut values| {
        Ast::ArrayCall {
            expression: Box::new(take(&mut values, 0)),
            indexer: Box::new(take(&mut values, 2)),
        }
    });
    g.rule("Postfix", &["Atom"], pass);

    // Atoms
    g.rule("Atom", &["num"], |values| {
        constant(values, ConstantKind::Number)
    });
    g.rule("Atom", &["str"], |values| {
        constant(values, ConstantKind::String)
    });
    g.rule("Atom", &["bool"], |values| {
        constant(values, ConstantKind::Boolean)
    });
    g.rule("Atom", &["id"], |mut values| Ast::Atomic {
        name: tok(take(&mut values, 0)),
    });
    g.rule("Atom", &["id", "(", "Args", ")"], |mut values| {
        Ast::ExpressionCall {
            name: tok(take(&mut values, 0)),
            arguments: list(take(&mut values, 2)),
        }
    });
    g.rule("Atom", &["(", "Expr", ")"], |mut values| take(&mut values, 1));
    g.rule(
        "Atom",
        &["new", "id", "(", "Args", ")"],
        |mut values| Ast::New {
            name: tok(take(&mut values, 1)),
            arguments: list(take(&mut values, 3)),
        },
    );
    g.rule("Atom", &["Block"], pass);
    g.rule("Atom", &["[", "ExprList", "]"], |mut values| {
        Ast::ExplicitArrayDeclaration {
            open: tok(take(&mut values, 0)),
            values: list(take(&mut values, 1)),
        }
    });
    g.rule(
        "Atom",
        &["[", "Expr", "||", "id", "in", "Expr", "]"],
        |mut values| Ast::ImplicitArrayDeclaration {
            item: tok(take(&mut values, 3)),
            iterable: Box::new(take(&mut values, 5)),
            expression: Box::new(take(&mut values, 1)),
        },
    );

    g.rule("Args", &[], empty_list);
    g.rule("Args", &["ArgList"], pass);
    g.rule("ArgList", &["Expr"], single);
    g.rule("ArgList", &["ArgList", ",", "Expr"], append);

    g.rule("ExprList", &[], empty_list);
    g.rule("ExprList", &["ArgList"], pass);

    g.rule("Block", &["{", "Stmts", "}"], |mut values| {
        Ast::ExpressionBlock {
            instructions: list(take(&mut values, 1)),
        }
    });
    g.rule("Stmts", &["Stmt"], single);
    g.rule("Stmts", &["Stmts", "Stmt"], append);
    g.rule("Stmt", &["Expr", ";"], |mut values| take(&mut values, 0));

    g
}
