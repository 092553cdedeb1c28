//! Built-in mail templates.
//!
//! The fallback table consulted when no template directory supplies a name.
//! Every entry has an HTML body and a subject line, both rendered with the
//! same data.

/// A compiled-in template and its subject line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinTemplate {
    /// Lookup name, e.g. `fee_reminder`.
    pub name: &'static str,
    /// Subject line template.
    pub subject: &'static str,
    /// HTML body template.
    pub html: &'static str,
}

/// Returns the built-in template named `name`.
pub fn find(name: &str) -> Option<&'static BuiltinTemplate> {
    BUILTIN_TEMPLATES.iter().find(|t| t.name == name)
}

/// Returns all built-in names, sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTIN_TEMPLATES.iter().map(|t| t.name).collect();
    names.sort_unstable();
    names
}

/// The built-in template table.
pub static BUILTIN_TEMPLATES: &[BuiltinTemplate] = &[
    BuiltinTemplate {
        name: "welcome",
        subject: "Welcome to {{company_name}}, {{name}}!",
        html: r#"<html><body>
<h1>Welcome, {{name}}!</h1>
<p>Your {{company_name}} account is ready.{{#if role}} You have been registered as a {{role}}.{{/if}}</p>
{{#if batch_name}}<p>You are enrolled in <strong>{{batch_name}}</strong>.</p>{{/if}}
<p>Sign in at <a href="{{website_url}}/login">{{website_url}}/login</a>{{#if username}} with the username <strong>{{username}}</strong>{{/if}}.</p>
<hr>
<p>{{company_name}}{{support_phone}} &middot; {{support_phone}}{{/support_phone}}<br>Questions? Write to {{support_email}}.</p>
<p>&copy; {{current_year}} {{company_name}}</p>
</body></html>"#,
    },
    BuiltinTemplate {
        name: "password_reset",
        subject: "Reset your {{company_name}} password",
        html: r#"<html><body>
<h1>Password reset</h1>
<p>Hi {{name}},</p>
<p>We received a request to reset your password. Use the link below to choose a new one:</p>
<p><a href="{{reset_url}}">{{reset_url}}</a></p>
<p>This link expires in {{expires_in}}. If you did not ask for a reset, you can ignore this email.</p>
<hr>
<p>{{company_name}}{{support_phone}} &middot; {{support_phone}}{{/support_phone}}<br>Questions? Write to {{support_email}}.</p>
<p>&copy; {{current_year}} {{company_name}}</p>
</body></html>"#,
    },
    BuiltinTemplate {
        name: "email_verification",
        subject: "Verify your email address for {{company_name}}",
        html: r#"<html><body>
<h1>Confirm your email</h1>
<p>Hi {{name}},</p>
{{#if code}}<p>Your verification code is <strong>{{code}}</strong>.</p>{{/if}}
{{#if verification_url}}<p>Or confirm directly: <a href="{{verification_url}}">{{verification_url}}</a></p>{{/if}}
<p>This expires in {{expires_in}}.</p>
<hr>
<p>{{company_name}}{{support_phone}} &middot; {{support_phone}}{{/support_phone}}<br>Questions? Write to {{support_email}}.</p>
<p>&copy; {{current_year}} {{company_name}}</p>
</body></html>"#,
    },
    BuiltinTemplate {
        name: "fee_reminder",
        subject: "{{#if overdue}}Overdue: {{/if}}Fee reminder for {{student_name}} - {{currency}}{{amount}}",
        html: r#"<html><body>
<h1>Fee reminder</h1>
<p>Dear {{name}},</p>
<p>This is a reminder that {{currency}}{{amount}} is due{{#if student_name}} for {{student_name}}{{/if}}{{#if due_date}} on {{due_date}}{{/if}}.{{#if overdue}} <strong>This payment is overdue.</strong>{{/if}}</p>
{{#if items}}<table>
<tr><th>Item</th><th>Amount</th></tr>
{{#each items}}<tr><td>{{description}}</td><td>{{amount}}</td></tr>
{{/each}}</table>{{/if}}
{{#if late_fee}}<p>A late fee of {{currency}}{{late_fee}} applies after the due date.</p>{{/if}}
{{#if payment_url}}<p><a href="{{payment_url}}">Pay online</a></p>{{/if}}
{{^payment_url}}<p>Please pay at the front office.</p>{{/payment_url}}
<hr>
<p>{{company_name}}{{support_phone}} &middot; {{support_phone}}{{/support_phone}}<br>Questions? Write to {{support_email}}.</p>
<p>&copy; {{current_year}} {{company_name}}</p>
</body></html>"#,
    },
    BuiltinTemplate {
        name: "payment_receipt",
        subject: "Payment received - receipt {{receipt_number}}",
        html: r#"<html><body>
<h1>Payment receipt</h1>
<p>Dear {{name}},</p>
<p>We have received {{currency}}{{amount}}{{#if payment_method}} by {{payment_method}}{{/if}}{{#if payment_date}} on {{payment_date}}{{/if}}. Thank you.</p>
<p>Receipt number: <strong>{{receipt_number}}</strong>{{#if transaction_id}}<br>Transaction: {{transaction_id}}{{/if}}</p>
{{#if items}}<table>
<tr><th>Item</th><th>Amount</th></tr>
{{#each items}}<tr><td>{{description}}</td><td>{{amount}}</td></tr>
{{/each}}</table>{{/if}}
{{#if balance}}<p>Remaining balance: {{currency}}{{balance}}</p>{{/if}}
{{^balance}}<p>Your account is fully paid.</p>{{/balance}}
<hr>
<p>{{company_name}}{{support_phone}} &middot; {{support_phone}}{{/support_phone}}<br>Questions? Write to {{support_email}}.</p>
<p>&copy; {{current_year}} {{company_name}}</p>
</body></html>"#,
    },
    BuiltinTemplate {
        name: "exam_result",
        subject: "Results: {{exam_name}}",
        html: r#"<html><body>
<h1>{{exam_name}} results</h1>
<p>Dear {{name}},</p>
<p>{{#if student_name}}{{student_name}} scored{{/if}}{{^student_name}}You scored{{/student_name}} <strong>{{marks_obtained}}/{{total_marks}}</strong>{{#if percentage}} ({{percentage}}%){{/if}}.</p>
{{#if grade}}<p>Grade: {{grade}}</p>{{/if}}
{{#if rank}}<p>Rank in batch: {{rank}}</p>{{/if}}
{{#if subjects}}<table>
<tr><th>Subject</th><th>Marks</th></tr>
{{#each subjects}}<tr><td>{{subject}}</td><td>{{marks}}/{{total}}</td></tr>
{{/each}}</table>{{/if}}
{{#if passed}}<p>Congratulations on passing!</p>{{/if}}
{{^passed}}<p>Please meet your instructor to plan a re-attempt.</p>{{/passed}}
{{#if remarks}}<p>Remarks: {{remarks}}</p>{{/if}}
<hr>
<p>{{company_name}}{{support_phone}} &middot; {{support_phone}}{{/support_phone}}<br>Questions? Write to {{support_email}}.</p>
<p>&copy; {{current_year}} {{company_name}}</p>
</body></html>"#,
    },
    BuiltinTemplate {
        name: "attendance_alert",
        subject: "Attendance alert for {{student_name}}",
        html: r#"<html><body>
<h1>Attendance alert</h1>
<p>Dear {{name}},</p>
<p>{{student_name}} was marked <strong>{{status}}</strong>{{#if date}} on {{date}}{{/if}}{{#if batch_name}} in {{batch_name}}{{/if}}.</p>
{{#if attendance_percentage}}<p>Attendance so far: {{attendance_percentage}}%.</p>{{/if}}
{{#if below_threshold}}<p><strong>Attendance is below the required minimum{{#if threshold}} of {{threshold}}%{{/if}}.</strong></p>{{/if}}
<hr>
<p>{{company_name}}{{support_phone}} &middot; {{support_phone}}{{/support_phone}}<br>Questions? Write to {{support_email}}.</p>
<p>&copy; {{current_year}} {{company_name}}</p>
</body></html>"#,
    },
    BuiltinTemplate {
        name: "batch_assignment",
        subject: "You have been assigned to {{batch_name}}",
        html: r#"<html><body>
<h1>New batch assignment</h1>
<p>Hi {{name}},</p>
<p>You have been assigned to <strong>{{batch_name}}</strong>{{#if course}} ({{course}}){{/if}}{{#if start_date}}, starting {{start_date}}{{/if}}.</p>
{{#if teacher}}<p>Instructor: {{teacher.name}}{{#if teacher.email}} ({{teacher.email}}){{/if}}</p>{{/if}}
{{#if schedule}}<ul>
{{#each schedule}}<li>{{day}}: {{time}}</li>
{{/each}}</ul>{{/if}}
<hr>
<p>{{company_name}}{{support_phone}} &middot; {{support_phone}}{{/support_phone}}<br>Questions? Write to {{support_email}}.</p>
<p>&copy; {{current_year}} {{company_name}}</p>
</body></html>"#,
    },
    BuiltinTemplate {
        name: "class_schedule",
        subject: "Class schedule for {{batch_name}}{{#if week_of}}, week of {{week_of}}{{/if}}",
        html: r#"<html><body>
<h1>{{batch_name}} schedule</h1>
<p>Hi {{name}},</p>
{{#if classes}}<table>
<tr><th>Day</th><th>Time</th><th>Subject</th><th>Teacher</th></tr>
{{#each classes}}<tr><td>{{day}}</td><td>{{time}}</td><td>{{subject}}</td><td>{{teacher}}</td></tr>
{{/each}}</table>{{/if}}
{{^classes}}<p>No classes are scheduled this week.</p>{{/classes}}
{{#if venue}}<p>Venue: {{venue}}</p>{{/if}}
<hr>
<p>{{company_name}}{{support_phone}} &middot; {{support_phone}}{{/support_phone}}<br>Questions? Write to {{support_email}}.</p>
<p>&copy; {{current_year}} {{company_name}}</p>
</body></html>"#,
    },
    BuiltinTemplate {
        name: "announcement",
        subject: "{{title}}",
        html: r#"<html><body>
<h1>{{title}}</h1>
{{#if name}}<p>Hi {{name}},</p>{{/if}}
<p>{{message}}</p>
{{#if action_url}}<p><a href="{{action_url}}">{{#if action_label}}{{action_label}}{{/if}}{{^action_label}}Read more{{/action_label}}</a></p>{{/if}}
{{#if author}}<p>- {{author}}</p>{{/if}}
<hr>
<p>{{company_name}}{{support_phone}} &middot; {{support_phone}}{{/support_phone}}<br>Questions? Write to {{support_email}}.</p>
<p>&copy; {{current_year}} {{company_name}}</p>
</body></html>"#,
    },
];
