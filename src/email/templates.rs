use crate::models::Lead;

pub fn lead_subject(lead: &Lead) -> String {
    format!("New lead: {}", lead.company)
}

pub fn render_lead_notification(lead: &Lead) -> String {
    format!(
        "New lead received\n\
         \n\
         Name: {name}\n\
         Company: {company}\n\
         Role: {role}\n\
         Email: {email}\n\
         System: {system}\n\
         \n\
         Workflow:\n\
         {workflow}\n\
         \n\
         Time (UTC): {created_at}\n\
         IP: {ip}\n",
        name = lead.name,
        company = lead.company,
        role = lead.role.as_deref().unwrap_or("-"),
        email = lead.email,
        system = lead.system.as_deref().unwrap_or("-"),
        workflow = lead.workflow,
        created_at = lead.created_at.to_rfc3339(),
        ip = lead.ip,
    )
}
