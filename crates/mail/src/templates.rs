use metrohost_core::{ContactMessage, SubmissionRecord};
use tera::{Context, Tera};

use crate::message::OutboundEmail;
use crate::transport::MailError;

const APPLICATION_OPERATOR: &str = "application_operator.html";
const APPLICATION_CONFIRMATION: &str = "application_confirmation.html";
const CONTACT_OPERATOR: &str = "contact_operator.html";
const CONTACT_CONFIRMATION: &str = "contact_confirmation.html";

const APPLICATION_OPERATOR_SUBJECT: &str = "New Property Application - MetroHost Collective";
const APPLICATION_CONFIRMATION_SUBJECT: &str = "Application Received - MetroHost Collective";
const CONTACT_OPERATOR_SUBJECT: &str = "New Contact Form Submission - MetroHost Collective";
const CONTACT_CONFIRMATION_SUBJECT: &str = "Thank you for contacting MetroHost Collective";

/// Renders the four intake email bodies from embedded templates.
pub struct MailTemplates {
    tera: Tera,
}

impl MailTemplates {
    pub fn new() -> Result<Self, MailError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (APPLICATION_OPERATOR, include_str!("../templates/application_operator.html")),
            (APPLICATION_CONFIRMATION, include_str!("../templates/application_confirmation.html")),
            (CONTACT_OPERATOR, include_str!("../templates/contact_operator.html")),
            (CONTACT_CONFIRMATION, include_str!("../templates/contact_confirmation.html")),
        ])?;
        Ok(Self { tera })
    }

    /// Operator notification for a qualification-flow submission.
    pub fn application_operator(
        &self,
        from: &str,
        operator: &str,
        record: &SubmissionRecord,
    ) -> Result<OutboundEmail, MailError> {
        let mut context = Context::new();
        context.insert("name", &record.contact.name);
        context.insert("email", &record.contact.email);
        context.insert("phone", provided(&record.contact.phone));
        context.insert("preferred_contact", provided(&record.contact.preferred_contact));
        context.insert("best_time", provided(&record.contact.best_time));
        context.insert("city_zip", provided(&record.property.city_zip));
        context.insert("space_type", provided(&record.property.space_type));
        context.insert("rental_type", provided(&record.property.rental_type));
        context.insert("guest_capacity", provided(&record.property.guest_capacity));
        context.insert("approximate_size", provided(&record.property.approximate_size));
        context.insert("furnished", provided(&record.property.furnished));
        context.insert("private_entrance", provided(&record.property.private_entrance));
        context.insert("live_at_property", provided(&record.property.live_at_property));
        context.insert("bathroom_situation", provided(&record.property.bathroom_situation));
        context.insert("ready_for_photography", provided(&record.property.ready_for_photography));
        context.insert("pets_allowed", provided(&record.property.pets_allowed));
        context.insert("restrictions", fallback(&record.property.restrictions, "None mentioned"));
        context.insert("hosting_timeline", provided(&record.goals.hosting_timeline));
        context.insert("priority", provided(&record.goals.priority));
        context.insert("involvement_level", provided(&record.goals.involvement_level));
        context.insert("submission_date", &record.submission_date);

        let html = self.tera.render(APPLICATION_OPERATOR, &context)?;
        Ok(OutboundEmail::new(from, operator, APPLICATION_OPERATOR_SUBJECT, html))
    }

    /// Acknowledgment sent to the submitter of a qualification-flow record.
    pub fn application_confirmation(
        &self,
        from: &str,
        record: &SubmissionRecord,
    ) -> Result<OutboundEmail, MailError> {
        let mut context = Context::new();
        context.insert("name", &record.contact.name);
        context.insert(
            "preferred_contact",
            fallback(&record.contact.preferred_contact, "email"),
        );

        let html = self.tera.render(APPLICATION_CONFIRMATION, &context)?;
        Ok(OutboundEmail::new(
            from,
            &record.contact.email,
            APPLICATION_CONFIRMATION_SUBJECT,
            html,
        ))
    }

    pub fn contact_operator(
        &self,
        from: &str,
        operator: &str,
        message: &ContactMessage,
        submission_date: &str,
    ) -> Result<OutboundEmail, MailError> {
        let mut context = Context::new();
        context.insert("name", &message.name);
        context.insert("email", &message.email);
        context.insert("phone", provided(&message.phone));
        context.insert("service", fallback(&message.service, "Not specified"));
        context.insert("message", &message.message);
        context.insert("submission_date", submission_date);

        let html = self.tera.render(CONTACT_OPERATOR, &context)?;
        Ok(OutboundEmail::new(from, operator, CONTACT_OPERATOR_SUBJECT, html))
    }

    pub fn contact_confirmation(
        &self,
        from: &str,
        message: &ContactMessage,
    ) -> Result<OutboundEmail, MailError> {
        let mut context = Context::new();
        context.insert("name", &message.name);

        let html = self.tera.render(CONTACT_CONFIRMATION, &context)?;
        Ok(OutboundEmail::new(from, &message.email, CONTACT_CONFIRMATION_SUBJECT, html))
    }
}

fn provided(value: &str) -> &str {
    fallback(value, "Not provided")
}

fn fallback<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}
