use chicory::ast::builder::TreeBuilder;
use chicory::ast::{PrimitiveName, Program, Stmt};
use chicory::typecheck::subst::Substitution;
use chicory::{check_program, check_program_with, CheckOutput, CheckerConfig, SymbolKind, Type};

fn check_ok(program: &Program) -> CheckOutput {
    let out = check_program(program).expect("well-formed tree");
    assert!(out.is_ok(), "type diagnostics: {:?}", out.diagnostics);
    out
}

fn check_codes(program: &Program) -> Vec<String> {
    let out = check_program(program).expect("well-formed tree");
    out.codes().into_iter().map(str::to_string).collect()
}

fn option_decl(b: &TreeBuilder) -> Stmt {
    b.type_decl(
        "T",
        b.ty_adt(vec![
            b.option("None"),
            b.option_primitive("Some", PrimitiveName::Number),
        ]),
    )
}

#[test]
fn typecheck_single_assignment() {
    let b = TreeBuilder::new();
    let out = check_ok(&b.program(vec![b.let_("a", b.num(1.0))]));
    assert_eq!(out.symbols.len(), 1);
    let a = out.symbol("a").unwrap();
    assert_eq!(a.kind, SymbolKind::Variable);
    assert_eq!(a.ty, Type::number());
}

#[test]
fn typecheck_mismatch_points_at_operand() {
    let b = TreeBuilder::new();
    let rhs = b.str_("x");
    let rhs_id = rhs.id;
    let program = b.program(vec![b.expr_stmt(b.op(b.num(1.0), "+", rhs))]);
    let out = check_program(&program).unwrap();
    assert_eq!(out.diagnostics.len(), 1);
    let diag = &out.diagnostics[0];
    assert_eq!(diag.code, "E3003");
    assert_eq!(diag.message, "type mismatch between number and string");
    assert_eq!(diag.node, rhs_id);
}

#[test]
fn typecheck_match_on_adt() {
    let b = TreeBuilder::new();
    let body = b.var("n");
    let body_id = body.id;
    let matched = b.match_(
        b.var("v"),
        vec![
            (b.pat_ctor("None"), b.num(0.0)),
            (b.pat_ctor_bind("Some", "n"), body),
        ],
    );
    let match_id = matched.id;
    let program = b.program(vec![
        option_decl(&b),
        b.let_("v", b.call(b.var("Some"), vec![b.num(1.0)])),
        b.expr_stmt(matched),
        b.expr_stmt(b.var("n")),
    ]);
    let out = check_program(&program).unwrap();
    // `n` is gone once its arm closes.
    assert_eq!(out.codes(), vec!["E3001"]);
    assert_eq!(out.type_of(match_id), Some(&Type::number()));
    assert_eq!(out.type_of(body_id), Some(&Type::number()));
}

#[test]
fn typecheck_member_on_tuple() {
    let b = TreeBuilder::new();
    let program = b.program(vec![
        b.let_("a", b.array(vec![b.num(1.0)])),
        b.expr_stmt(b.member(b.var("a"), "b")),
    ]);
    let out = check_program(&program).unwrap();
    assert_eq!(out.codes(), vec!["E3007"]);
    assert_eq!(
        out.diagnostics[0].message,
        "cannot access member 'b' of non-record [number]"
    );
}

#[test]
fn typecheck_lambda_resolves_parameter() {
    let b = TreeBuilder::new();
    let lambda = b.func(&["x"], b.op(b.var("x"), "+", b.num(1.0)));
    let lambda_id = lambda.id;
    let out = check_ok(&b.program(vec![b.expr_stmt(lambda)]));
    assert_eq!(
        out.type_of(lambda_id),
        Some(&Type::func(vec![Type::number()], Type::number()))
    );
    assert_eq!(out.symbol("x").unwrap().kind, SymbolKind::Parameter);
}

#[test]
fn typecheck_inner_scopes_do_not_leak() {
    let b = TreeBuilder::new();
    let program = b.program(vec![
        b.expr_stmt(b.block(vec![b.let_("inner", b.num(1.0))], None)),
        b.expr_stmt(b.func(&["p"], b.var("p"))),
        b.expr_stmt(b.var("inner")),
        b.expr_stmt(b.var("p")),
    ]);
    assert_eq!(check_codes(&program), vec!["E3001", "E3001"]);
}

#[test]
fn typecheck_shadowing_keeps_outer_binding() {
    let b = TreeBuilder::new();
    let program = b.program(vec![
        b.let_("x", b.num(1.0)),
        b.let_(
            "inner",
            b.block(vec![b.let_("x", b.str_("s"))], Some(b.var("x"))),
        ),
        b.let_("outer", b.var("x")),
        b.let_("seen", b.block(Vec::new(), Some(b.var("x")))),
    ]);
    let out = check_ok(&program);
    assert_eq!(out.symbol("inner").unwrap().ty, Type::string());
    assert_eq!(out.symbol("outer").unwrap().ty, Type::number());
    assert_eq!(out.symbol("seen").unwrap().ty, Type::number());
}

#[test]
fn typecheck_record_unification_through_calls() {
    let b = TreeBuilder::new();
    let program = b.program(vec![
        b.let_("take", b.func(&["p"], b.num(0.0))),
        b.expr_stmt(b.call(b.var("take"), vec![b.record(vec![("x", b.num(1.0))])])),
        b.expr_stmt(b.call(b.var("take"), vec![b.record(vec![("y", b.num(1.0))])])),
    ]);
    assert_eq!(check_codes(&program), vec!["E3006", "E3006"]);
}

#[test]
fn typecheck_self_application_is_infinite() {
    let b = TreeBuilder::new();
    let program = b.program(vec![b.expr_stmt(b.func(
        &["f"],
        b.call(b.var("f"), vec![b.var("f")]),
    ))]);
    assert_eq!(check_codes(&program), vec!["E3018"]);
}

#[test]
fn typecheck_imports_and_exports() {
    let b = TreeBuilder::new();
    let program = b.program(vec![
        b.import(Some("React"), &["useState"], "react"),
        b.import(None, &["useState"], "preact"),
        b.let_("count", b.num(0.0)),
        b.export(&["count", "React", "missing"]),
    ]);
    let out = check_program(&program).unwrap();
    assert_eq!(out.codes(), vec!["E3002", "E3021"]);
    let react = out.symbol("React").unwrap();
    assert_eq!(react.kind, SymbolKind::Import);
    assert_eq!(react.ty, Type::external("react"));
}

#[test]
fn typecheck_component_markup() {
    let b = TreeBuilder::new();
    let program = b.program(vec![
        b.let_(
            "Greeting",
            b.func(&["props"], b.markup(b.self_closing("p", Vec::new()))),
        ),
        b.let_(
            "page",
            b.markup(b.element(
                "main",
                Vec::new(),
                vec![chicory::ast::MarkupChild::Element(b.self_closing(
                    "Greeting",
                    vec![b.attr_str("name", "Ada")],
                ))],
            )),
        ),
    ]);
    let out = check_ok(&program);
    assert_eq!(out.symbol("page").unwrap().ty, Type::jsx());
}

#[test]
fn typecheck_strict_redeclaration_is_opt_in() {
    let b = TreeBuilder::new();
    let program = b.program(vec![b.let_("a", b.num(1.0)), b.let_("a", b.num(2.0))]);
    check_ok(&program);

    let config = CheckerConfig {
        strict_redeclaration: true,
        ..CheckerConfig::default()
    };
    let out = check_program_with(&program, &config).unwrap();
    assert_eq!(out.codes(), vec!["E3020"]);
    assert_eq!(out.diagnostics[0].message, "'a' is already declared in this scope");
    let labels = &out.diagnostics[0].labels;
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].message, "'a' first declared here");
}

#[test]
fn typecheck_malformed_tree_is_fatal() {
    let b = TreeBuilder::new();
    let program = b.program(vec![
        b.expr_stmt(b.var("undefined_first")),
        b.expr_stmt(b.if_chain(Vec::new(), Some(b.num(1.0)))),
    ]);
    let err = check_program(&program).unwrap_err();
    let wrapped: chicory::ChicoryError = err.into();
    assert!(wrapped.to_string().starts_with("malformed tree at node"));
}

#[test]
fn resolve_is_idempotent() {
    let mut subst = Substitution::new();
    let a = subst.fresh();
    let b = subst.fresh();
    let c = subst.fresh();
    subst.bind(a.as_var().unwrap(), b.clone());
    subst.bind(b.as_var().unwrap(), Type::tuple(vec![c.clone(), Type::number()]));
    for ty in [a, b, c, Type::string()] {
        let once = subst.resolve(&ty);
        assert_eq!(subst.resolve(&once), once);
    }
}
