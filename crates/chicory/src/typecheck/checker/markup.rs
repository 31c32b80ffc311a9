use std::collections::BTreeMap;

use tracing::trace;

use super::{Located, TypeChecker};
use crate::ast::{AttrValue, Markup, MarkupChild};
use crate::typecheck::error::{MalformedTree, TypeErrorKind};
use crate::typecheck::types::Type;

impl TypeChecker {
    /// Markup is always `jsx`. Components are checked as `(props) -> jsx`
    /// where `props` is the record built from the attributes.
    pub(super) fn infer_markup(&mut self, markup: &Markup) -> Result<Type, MalformedTree> {
        if let Some(closing) = &markup.closing {
            if closing.name != markup.name.name {
                return Err(MalformedTree {
                    node: markup.id,
                    reason: format!(
                        "closing tag '{}' does not match '{}'",
                        closing.name, markup.name.name
                    ),
                });
            }
        }

        let mut fields = BTreeMap::new();
        for attr in &markup.attributes {
            let ty = match &attr.value {
                AttrValue::String(_) => Type::string(),
                AttrValue::Number(_) => Type::number(),
                AttrValue::Expr(expr) => self.infer_expr(expr)?,
            };
            fields.insert(attr.name.name.clone(), ty);
        }
        let props = Type::Record { fields };

        if self.is_intrinsic(&markup.name.name) {
            trace!(tag = %markup.name.name, "intrinsic element");
        } else {
            match self.lookup_value(&markup.name.name) {
                Some(component) => {
                    let expected = Type::func(vec![props], Type::jsx());
                    self.unify(&component, &expected, markup.name.site());
                }
                None => self.report(
                    TypeErrorKind::UndefinedComponent(markup.name.name.clone()),
                    markup.name.site(),
                ),
            }
        }

        for child in &markup.children {
            match child {
                MarkupChild::Text(_) => {}
                MarkupChild::Expr(expr) => {
                    self.infer_expr(expr)?;
                }
                MarkupChild::Element(element) => {
                    self.infer_markup(element)?;
                }
            }
        }
        Ok(Type::jsx())
    }

    fn is_intrinsic(&self, tag: &str) -> bool {
        self.config.intrinsic_elements && tag.starts_with(|c: char| c.is_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::builder::TreeBuilder;
    use crate::ast::MarkupChild;
    use crate::typecheck::{check_program, check_program_with, Type};
    use crate::CheckerConfig;

    #[test]
    fn component_props_are_inferred_from_attributes() {
        let b = TreeBuilder::new();
        let program = b.program(vec![
            b.let_(
                "Button",
                b.func(&["props"], b.markup(b.self_closing("button", Vec::new()))),
            ),
            b.let_(
                "view",
                b.markup(b.self_closing(
                    "Button",
                    vec![b.attr_str("label", "ok"), b.attr_num("size", 2.0)],
                )),
            ),
        ]);
        let out = check_program(&program).unwrap();
        assert!(out.is_ok(), "{:?}", out.diagnostics);
        assert_eq!(out.symbol("view").unwrap().ty, Type::jsx());
        assert_eq!(
            out.symbol("Button").unwrap().ty.to_string(),
            "({ label: string, size: number }) -> jsx"
        );
    }

    #[test]
    fn unknown_component_and_non_function_component() {
        let b = TreeBuilder::new();
        let program = b.program(vec![
            b.let_("Title", b.num(1.0)),
            b.expr_stmt(b.markup(b.self_closing("Missing", Vec::new()))),
            b.expr_stmt(b.markup(b.self_closing("Title", Vec::new()))),
        ]);
        let out = check_program(&program).unwrap();
        assert_eq!(out.codes(), vec!["E3015", "E3003"]);
        assert_eq!(out.diagnostics[0].message, "undefined component 'Missing'");
    }

    #[test]
    fn host_elements_need_lookup_when_intrinsics_are_off() {
        let b = TreeBuilder::new();
        let program = b.program(vec![b.expr_stmt(b.markup(b.self_closing("div", Vec::new())))]);
        assert!(check_program(&program).unwrap().is_ok());

        let config = CheckerConfig {
            intrinsic_elements: false,
            ..CheckerConfig::default()
        };
        let out = check_program_with(&program, &config).unwrap();
        assert_eq!(out.codes(), vec!["E3015"]);
    }

    #[test]
    fn children_and_attribute_expressions_are_checked() {
        let b = TreeBuilder::new();
        let inner = b.element("span", Vec::new(), vec![MarkupChild::Expr(b.var("missing"))]);
        let program = b.program(vec![b.expr_stmt(b.markup(b.element(
            "div",
            vec![b.attr_expr("count", b.op(b.num(1.0), "+", b.str_("x")))],
            vec![
                MarkupChild::Text("hello".to_string()),
                MarkupChild::Element(inner),
            ],
        )))]);
        let out = check_program(&program).unwrap();
        assert_eq!(out.codes(), vec!["E3003", "E3001"]);
    }

    #[test]
    fn mismatched_closing_tag_is_malformed() {
        let b = TreeBuilder::new();
        let mut element = b.element("div", Vec::new(), Vec::new());
        element.closing = Some(b.ident("span"));
        let program = b.program(vec![b.expr_stmt(b.markup(element))]);
        let err = check_program(&program).unwrap_err();
        assert!(err.reason.contains("'span' does not match 'div'"));
    }
}
