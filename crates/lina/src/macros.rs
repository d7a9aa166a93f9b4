/*
 * macros.rs
 * Copyright (c) 2025 Posit, PBC
 */

/// Build a mapping context from `name = value` pairs.
///
/// Values can be anything convertible into a
/// [`TemplateValue`](crate::TemplateValue), including nested `context!`
/// invocations.
///
/// ```
/// use lina::{Template, context};
///
/// let template = Template::compile("{{#t:l-s=, }}{{name}}{{/t}} in {{file}}").unwrap();
/// let ctx = context! {
///     file = "regs.h",
///     t = vec![context!(name = "A"), context!(name = "B")],
/// };
/// assert_eq!(template.render(&ctx).unwrap(), "A, B in regs.h");
/// ```
#[macro_export]
macro_rules! context {
    () => {
        $crate::TemplateValue::map()
    };
    ($($name:ident = $value:expr),+ $(,)?) => {{
        let mut ctx = $crate::TemplateValue::map();
        $(
            ctx.insert(stringify!($name), $value);
        )+
        ctx
    }};
}
