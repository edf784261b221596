use handlebars::Handlebars;
use serde::Serialize;

pub const APP_NAME: &str = "Splitwise Clone";

const HTML_TEMPLATE_NAME: &str = "invite_html";
const TEXT_TEMPLATE_NAME: &str = "invite_text";

// `{{name}}` is HTML-escaped by handlebars; the link uses `{{{...}}}` so it
// lands verbatim and must be validated before rendering.
const INVITE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body {
      font-family: Arial, sans-serif;
      line-height: 1.6;
      color: #333;
      max-width: 600px;
      margin: 0 auto;
      padding: 20px;
    }
    .header {
      background: linear-gradient(135deg, #00D09C 0%, #00A67E 100%);
      color: white;
      padding: 30px;
      text-align: center;
      border-radius: 10px 10px 0 0;
    }
    .content {
      background: #f9f9f9;
      padding: 30px;
      border-radius: 0 0 10px 10px;
    }
    .button {
      display: inline-block;
      background: #00D09C;
      color: white;
      padding: 15px 30px;
      text-decoration: none;
      border-radius: 5px;
      margin: 20px 0;
      font-weight: bold;
    }
    .footer {
      text-align: center;
      margin-top: 30px;
      color: #666;
      font-size: 12px;
    }
  </style>
</head>
<body>
  <div class="header">
    <h1>🎉 You're Invited!</h1>
  </div>
  <div class="content">
    <p>Hi {{recipient_name}},</p>
    <p><strong>{{sender_name}}</strong> has invited you to join <strong>{{app_name}}</strong> - the easiest way to split bills and track shared expenses with friends!</p>
    <p>With {{app_name}}, you can:</p>
    <ul>
      <li>✅ Split bills with friends and family</li>
      <li>✅ Track who owes what</li>
      <li>✅ Settle up easily</li>
      <li>✅ Keep your finances organized</li>
    </ul>
    <div style="text-align: center;">
      <a href="{{{download_link}}}" class="button">Download the App</a>
    </div>
    <p>Start splitting expenses with {{sender_name}} today!</p>
    <p>Best regards,<br>The {{app_name}} Team</p>
  </div>
  <div class="footer">
    <p>This email was sent because {{sender_name}} added you as a friend on {{app_name}}.</p>
  </div>
</body>
</html>
"#;

const INVITE_TEXT: &str = "Hi {{{recipient_name}}},

{{{sender_name}}} has invited you to join {{{app_name}}} - the easiest way to split bills and track shared expenses with friends!

Download the app: {{{download_link}}}

Start splitting expenses with {{{sender_name}}} today!

Best regards,
The {{{app_name}}} Team

This email was sent because {{{sender_name}}} added you as a friend on {{{app_name}}}.
";

#[derive(Serialize, Debug)]
pub struct InviteContent<'a> {
    pub recipient_name: &'a str,
    pub sender_name: &'a str,
    pub download_link: &'a str,
    pub app_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedInvite {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Compiled invite templates, built once and shared across invocations.
pub struct InviteTemplate {
    registry: Handlebars<'static>,
}

impl InviteTemplate {
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(HTML_TEMPLATE_NAME, INVITE_HTML)?;
        registry.register_template_string(TEXT_TEMPLATE_NAME, INVITE_TEXT)?;
        Ok(Self { registry })
    }

    pub fn render(
        &self,
        recipient_name: &str,
        sender_name: &str,
        download_link: &str,
    ) -> Result<RenderedInvite, handlebars::RenderError> {
        let content = InviteContent {
            recipient_name,
            sender_name,
            download_link,
            app_name: APP_NAME,
        };

        Ok(RenderedInvite {
            subject: invite_subject(sender_name),
            html_body: self.registry.render(HTML_TEMPLATE_NAME, &content)?,
            text_body: self.registry.render(TEXT_TEMPLATE_NAME, &content)?,
        })
    }
}

pub fn invite_subject(sender_name: &str) -> String {
    format!("{} invited you to {}!", sender_name, APP_NAME)
}
