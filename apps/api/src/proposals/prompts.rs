// Prompt templates for the proposal and scope-alert composers.
// Filled with llm_client::prompts::render_template.

/// Proposal drafting template.
/// Replace: {freelancer_name}, {freelancer_email}, {client_name}, {title}, {project_type},
///          {deliverables}, {timeline}, {price}, {revision_limit}, {first_billable_revision},
///          {hourly_rate}, {exclusions}, {payment_terms}
pub const PROPOSAL_PROMPT_TEMPLATE: &str = r#"Draft a professional project proposal that protects the freelancer legally and reads like premium work.

PROJECT DETAILS
Freelancer: {freelancer_name}
Freelancer email: {freelancer_email}
Client: {client_name}
Project: {title}
Category: {project_type}
Deliverables: {deliverables}
Timeline: {timeline}
Price: {price}
Included revisions: {revision_limit}
Payment terms: {payment_terms}

Use exactly these sections, in this order, with headers in capital letters and a line of dashes (---) between sections:

PROJECT PROPOSAL
Prepared by {freelancer_name} for {client_name}. Include today's date and the project name "{title}".

EXECUTIVE SUMMARY
Two or three sentences tying the work to the client's business goal.

SCOPE OF WORK
A numbered list of concrete deliverables, one per line, based on: {deliverables}

EXPLICITLY NOT INCLUDED
List these items verbatim:
{exclusions}

REVISION POLICY
{revision_limit} rounds of revisions are included. Define what counts as a revision versus a new request.
State that revision {first_billable_revision} onward is billed at ${hourly_rate}/hour.

TIMELINE & MILESTONES
Split "{timeline}" into discovery, production, review and delivery phases with day counts.
State that client feedback is due within 3 business days or the timeline shifts accordingly.

INVESTMENT
Total: {price}. Payment schedule: {payment_terms}.
Include a 5% weekly late fee on overdue amounts, reimbursement of pre-approved expenses at cost, and USD as the currency.

PROJECT CANCELLATION
Cancellation fee of 25% of the total before 25% completion, 50% between 25% and 50%, and 75% after 50%.
Completed work is delivered once the cancellation fee is paid.

INTELLECTUAL PROPERTY
Ownership transfers to the client on receipt of final payment. The freelancer may show the work in a portfolio unless the client objects in writing.

ACCEPTANCE
The proposal is valid for 14 days. Close with signature lines for the client and for {freelancer_name}.

Keep it specific rather than generic, between 600 and 900 words."#;

/// Scope-alert email template.
/// Replace: {original_deliverables}, {price}, {revision_limit}, {revisions_used}, {client_request}
pub const SCOPE_ALERT_PROMPT_TEMPLATE: &str = r#"A client has asked for work outside the agreed project scope. Write the freelancer's reply email.

Agreed deliverables: {original_deliverables}
Agreed price: {price}
Revisions included: {revision_limit}
Revisions used so far: {revisions_used}
Client's new request: {client_request}

The email should:
1. Open warmly and reference the project
2. Acknowledge the request positively
3. Explain clearly that it is outside the original scope
4. Offer two options: (A) a paid change order priced in proportion to the original project, or (B) deferring it to a follow-up project
5. Stay friendly and keep the door open
6. Sign off professionally

Tone: confident, firm and friendly, never apologetic about scope. Under 200 words."#;
