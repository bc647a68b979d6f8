use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::error::TemplateError;

pub const APPLICATION: &str = "application";
pub const CONTROLLER: &str = "controller";
pub const POM: &str = "pom";
pub const PROPERTIES: &str = "properties";

const TEMPLATES: [(&str, &str); 4] = [
    (APPLICATION, include_str!("../templates/application.java.j2")),
    (CONTROLLER, include_str!("../templates/controller.java.j2")),
    (POM, include_str!("../templates/pom.xml.j2")),
    (PROPERTIES, include_str!("../templates/application.properties.j2")),
];

/// Owns the template environment for one generation run.
///
/// Undefined variables are errors, never empty strings.
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("javadoc", javadoc);
        env.add_filter("xml", xml);
        env.add_filter("xml_comment", xml_comment);

        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .map_err(|source| TemplateError {
                    template: name.to_string(),
                    source,
                })?;
        }
        Ok(Self { env })
    }

    /// Render the named template against any serializable context.
    pub fn render<S: Serialize>(&self, name: &str, ctx: &S) -> Result<String, TemplateError> {
        let wrap = |source| TemplateError {
            template: name.to_string(),
            source,
        };
        let template = self.env.get_template(name).map_err(wrap)?;
        template.render(ctx).map_err(wrap)
    }
}

/// Keep text from closing a Javadoc block or forming a Java unicode escape.
fn javadoc(value: String) -> String {
    value.replace("*/", "*&#47;").replace("\\u", "\\\\u")
}

fn xml(value: String) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// `--` may not appear inside an XML comment.
fn xml_comment(value: String) -> String {
    let mut out = value;
    while out.contains("--") {
        out = out.replace("--", "- -");
    }
    out
}
