use std::sync::Arc;

use anyhow::Context;
use biene_templates_contracts::{
    RenderedTemplate, Template, TemplateService, BASE_TEMPLATE, TEMPLATES,
};
use biene_utils::trace_instrument;
use tera::Tera;

#[derive(Debug, Clone)]
pub struct TemplateServiceImpl {
    tera: Arc<Tera>,
}

impl TemplateServiceImpl {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);

        let templates = TEMPLATES.iter().flat_map(|&(name, html, text)| {
            [(html_name(name), html), (text_name(name), text)]
        });

        tera.add_raw_templates(
            std::iter::once(("base.html".to_owned(), BASE_TEMPLATE)).chain(templates),
        )
        .context("Failed to compile email templates")?;

        Ok(Self { tera: tera.into() })
    }
}

impl TemplateService for TemplateServiceImpl {
    #[trace_instrument(skip_all, fields(template = T::NAME))]
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<RenderedTemplate> {
        let context = tera::Context::from_serialize(template)?;
        Ok(RenderedTemplate {
            html: self.tera.render(&html_name(T::NAME), &context)?,
            text: self.tera.render(&text_name(T::NAME), &context)?,
        })
    }
}

fn html_name(name: &str) -> String {
    format!("{name}.html")
}

fn text_name(name: &str) -> String {
    format!("{name}.txt")
}
