use crate::{
    constants::SUBJECT_PREFIX,
    entities::{contact_me::ContactSubmission, email::OutboundEmail},
};

/// Escapes the characters that would let user text open markup in an HTML body.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Message sent to the site owner. Replies go straight to the sender.
pub fn notification_email(
    submission: &ContactSubmission,
    owner_address: &str,
    sender_address: &str,
) -> OutboundEmail {
    let subject = match &submission.subject {
        Some(subject) => format!("{SUBJECT_PREFIX} {subject}"),
        None => format!("{SUBJECT_PREFIX} New Message"),
    };

    let html = format!(
        r#"
      <h2>New Contact Message</h2>
      <p><b>Name:</b> {name}</p>
      <p><b>Email:</b> {email}</p>
      <p><b>Subject:</b> {subject}</p>
      <p><b>Message:</b></p>
      <pre style="white-space:pre-wrap;font-family:ui-sans-serif,system-ui">{message}</pre>
    "#,
        name = escape_html(&submission.from_name),
        email = escape_html(&submission.reply_to),
        subject = escape_html(submission.subject.as_deref().unwrap_or("(no subject)")),
        message = escape_html(&submission.message),
    );

    OutboundEmail {
        to: owner_address.to_string(),
        from: sender_address.to_string(),
        reply_to: Some(submission.reply_to.clone()),
        subject,
        text: format!(
            "From: {} <{}>\n\n{}",
            submission.from_name, submission.reply_to, submission.message
        ),
        html,
    }
}

/// Auto-reply confirming receipt to whoever filled in the form.
pub fn acknowledgment_email(
    submission: &ContactSubmission,
    sender_address: &str,
    owner_name: &str,
) -> OutboundEmail {
    let html = format!(
        r#"
      <h2>Thank you for contacting me!</h2>
      <p>Hi {name},</p>
      <p>Thank you for reaching out through my portfolio. I have received your message and will get back to you soon.</p>
      <p><b>Your message:</b></p>
      <blockquote style="border-left:3px solid #4f46e5;padding-left:16px;margin:16px 0;color:#666;">
        {message}
      </blockquote>
      <p>Best regards,<br/>{owner}</p>
    "#,
        name = escape_html(&submission.from_name),
        message = escape_html(&submission.message),
        owner = escape_html(owner_name),
    );

    OutboundEmail {
        to: submission.reply_to.clone(),
        from: sender_address.to_string(),
        reply_to: None,
        subject: format!("Thank you for contacting me - {owner_name}"),
        text: format!(
            "Hi {},\n\nThank you for reaching out through my portfolio. I have received your message and will get back to you soon.\n\nBest regards,\n{}",
            submission.from_name, owner_name
        ),
        html,
    }
}
