use biene_email_contracts::{template::TemplateEmailService, Email, EmailBody, EmailService};
use biene_models::email_address::EmailAddressWithName;
use biene_templates_contracts::{
    ContactConfirmationTemplate, ContactNotificationTemplate, Template, TemplateService,
};

#[derive(Debug, Clone)]
pub struct TemplateEmailServiceImpl<Email, Template> {
    email: Email,
    template: Template,
}

impl<Email, Template> TemplateEmailServiceImpl<Email, Template> {
    pub fn new(email: Email, template: Template) -> Self {
        Self { email, template }
    }
}

impl<EmailS, Template> TemplateEmailService for TemplateEmailServiceImpl<EmailS, Template>
where
    EmailS: EmailService,
    Template: TemplateService,
{
    async fn send_contact_notification(
        &self,
        recipient: EmailAddressWithName,
        reply_to: EmailAddressWithName,
        data: &ContactNotificationTemplate,
    ) -> anyhow::Result<bool> {
        let subject = format!(
            "Neue Kontaktanfrage von {} - {}",
            data.name, data.organization.name
        );
        self.send_email(recipient, Some(reply_to), data, subject)
            .await
    }

    async fn send_contact_confirmation(
        &self,
        recipient: EmailAddressWithName,
        data: &ContactConfirmationTemplate,
    ) -> anyhow::Result<bool> {
        let subject = format!("Bestätigung Ihrer Nachricht - {}", data.organization.name);
        self.send_email(recipient, None, data, subject).await
    }
}

impl<EmailS, TemplateS> TemplateEmailServiceImpl<EmailS, TemplateS>
where
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn send_email<T: Template + 'static>(
        &self,
        recipient: EmailAddressWithName,
        reply_to: Option<EmailAddressWithName>,
        data: &T,
        subject: String,
    ) -> anyhow::Result<bool> {
        let rendered = self.template.render(data)?;
        self.email
            .send(Email {
                recipient,
                subject,
                body: EmailBody::Alternative {
                    html: rendered.html,
                    text: rendered.text,
                },
                reply_to,
            })
            .await
    }
}
