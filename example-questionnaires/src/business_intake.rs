//! Business automation intake: seven question steps about a small business,
//! its customers and what a chatbot should do for it.

use intake::{
    Choice, FlagQuestion, Question, QuestionKind, Questionnaire, RatingStatement, Step, TextFormat,
};

pub const BUSINESS_INTAKE_TITLE: &str = "Tech for my business";

fn options(pairs: &[(&str, &str)]) -> Vec<Choice> {
    pairs
        .iter()
        .map(|(value, label)| Choice::new(*value, *label))
        .collect()
}

fn yes_no(key: &str, ask: &str, yes: &str, no: &str) -> Question {
    Question::new(key, ask, QuestionKind::Flag(FlagQuestion::with_labels(yes, no)))
}

pub fn business_intake() -> Questionnaire {
    Questionnaire::new(
        BUSINESS_INTAKE_TITLE,
        vec![
            general_details(),
            about_the_business(),
            goals(),
            management(),
            sales(),
            bot_needs(),
            experience(),
        ],
    )
    .with_intro(
        "A short questionnaire that helps us prepare precise technology solutions \
         for your business, saving time and growing sales.",
    )
    .with_outro(
        "We will review your answers, prepare a tailored proposal and get back \
         to you within 24 hours.",
    )
}

fn general_details() -> Step {
    Step::new(
        "General details",
        vec![
            Question::text("businessName", "Business name").required(),
            Question::text("contactName", "Contact name").required(),
            Question::text("contactRole", "Your role in the business")
                .with_placeholder("Owner, CEO, marketing manager..."),
            Question::single_choice(
                "preferredContact",
                "How should we contact you?",
                options(&[("email", "Email"), ("phone", "Phone")]),
            ),
            Question::formatted("email", "Email", TextFormat::Email).required(),
            Question::formatted("phone", "Phone", TextFormat::Phone),
            Question::text("address", "Business address"),
            Question::formatted("website", "Website", TextFormat::Url),
            Question::single_choice(
                "referralSource",
                "How did you hear about us?",
                options(&[
                    ("google", "Google search"),
                    ("referral", "Recommendation from a friend"),
                    ("website", "Our website"),
                    ("email", "Email"),
                    ("event", "Event or conference"),
                    ("whatsapp", "WhatsApp"),
                    ("ads", "Online ad"),
                    ("other", "Other"),
                ]),
            ),
            Question::single_choice(
                "employeeCount",
                "How many employees?",
                options(&[
                    ("1", "Just me"),
                    ("2-5", "2-5"),
                    ("6-20", "6-20"),
                    ("21-50", "21-50"),
                    ("50+", "More than 50"),
                ]),
            ),
            Question::text("partnerCount", "How many partners?"),
        ],
    )
    .with_description("Let's start with the basics")
}

fn about_the_business() -> Step {
    Step::new(
        "About the business",
        vec![
            Question::single_choice(
                "businessField",
                "Field of business",
                options(&[
                    ("technology", "Technology"),
                    ("retail", "Retail"),
                    ("services", "Services"),
                    ("food", "Food and restaurants"),
                    ("health", "Health and wellness"),
                    ("education", "Education"),
                    ("finance", "Finance"),
                    ("real-estate", "Real estate"),
                    ("other", "Other"),
                ]),
            ),
            Question::single_choice(
                "businessAge",
                "How long has the business been running?",
                options(&[
                    ("new", "Less than a year"),
                    ("1-3", "1-3 years"),
                    ("3-10", "3-10 years"),
                    ("10+", "More than 10 years"),
                ]),
            ),
            Question::multiline("howStarted", "How did the business start?"),
            Question::multiline("vision", "Where do you see the business in a few years?"),
            Question::multiline("description", "Describe what the business does")
                .with_placeholder("Products, services, typical customers..."),
            Question::text("leadership", "Who runs the business day to day?"),
            Question::multiline("importantInfo", "Anything important we should know?"),
            Question::multiline("uniqueness", "What sets you apart from competitors?"),
        ],
    )
    .with_description("Tell us a bit about your business")
}

fn goals() -> Step {
    Step::new(
        "Goals",
        vec![
            Question::multi_choice(
                "currentProblems",
                "Which problems are you facing today?",
                options(&[
                    ("time-management", "Not enough time"),
                    ("customer-service", "Customer service load"),
                    ("lead-followup", "Following up on leads"),
                    ("repetitive-tasks", "Repetitive tasks"),
                    ("availability", "Availability outside business hours"),
                    ("scaling", "Growing without hiring"),
                ]),
            ),
            Question::multi_choice(
                "timeWasters",
                "What takes most of your time?",
                options(&[
                    ("phone-calls", "Phone calls"),
                    ("emails", "Emails"),
                    ("scheduling", "Scheduling meetings"),
                    ("basic-questions", "Answering basic questions"),
                    ("data-entry", "Data entry"),
                    ("follow-ups", "Follow-ups"),
                ]),
            ),
            Question::multi_choice(
                "leadGoals",
                "What would you like to achieve?",
                options(&[
                    ("no-missed-leads", "Never miss a lead"),
                    ("increase-sales", "Increase sales"),
                    ("better-cx", "Better customer experience"),
                    ("free-time", "Free up my time"),
                    ("automation", "Automate processes"),
                    ("qualify-leads", "Qualify leads automatically"),
                ]),
            ),
            Question::multiline("successMetrics", "How will you know it worked?")
                .with_placeholder("More meetings booked, faster replies, fewer calls..."),
        ],
    )
    .with_description("What should technology solve for you?")
}

fn management() -> Step {
    Step::new(
        "Management",
        vec![
            Question::single_choice(
                "customerService",
                "Who handles customer service?",
                options(&[
                    ("owner-only", "Only me"),
                    ("employees", "Employees"),
                    ("mixed", "Me and employees"),
                    ("outsourced", "An outside company"),
                ]),
            ),
            Question::flag("hasEmployees", "Do you have employees?"),
            Question::single_choice(
                "inquiryVolume",
                "How many inquiries do you get?",
                options(&[
                    ("1-5-daily", "1-5 a day"),
                    ("5-20-daily", "5-20 a day"),
                    ("20-50-daily", "20-50 a day"),
                    ("50+-daily", "More than 50 a day"),
                ]),
            ),
            Question::multi_choice(
                "inquirySources",
                "Where do inquiries come from?",
                options(&[
                    ("website", "Website"),
                    ("phone", "Phone"),
                    ("facebook", "Facebook"),
                    ("instagram", "Instagram"),
                    ("google-ads", "Google Ads"),
                    ("referrals", "Referrals"),
                    ("email", "Email"),
                    ("whatsapp", "WhatsApp"),
                ]),
            ),
            Question::flag("hasReps", "Do you have sales or service reps?"),
            Question::multi_choice(
                "commonQuestions",
                "What do customers usually ask?",
                options(&[
                    ("pricing", "Pricing"),
                    ("availability", "Availability"),
                    ("services", "Services offered"),
                    ("process", "How the process works"),
                    ("timeline", "Timelines"),
                    ("location", "Location and hours"),
                    ("support", "Technical support"),
                    ("refunds", "Returns and refunds"),
                ]),
            ),
            Question::multi_choice(
                "timeConsumingProcesses",
                "Which processes take the longest?",
                options(&[
                    ("quotes", "Preparing quotes"),
                    ("scheduling", "Scheduling"),
                    ("onboarding", "Onboarding new customers"),
                    ("reporting", "Reports"),
                    ("billing", "Billing and collection"),
                ]),
            ),
            Question::multiline("mainChallenge", "What is your biggest challenge right now?"),
        ],
    )
    .with_description("How the business runs today")
}

fn sales() -> Step {
    Step::new(
        "Sales",
        vec![
            Question::single_choice(
                "monthlyLeads",
                "How many leads do you get a month?",
                options(&[
                    ("1-50", "1-50"),
                    ("50-200", "50-200"),
                    ("200-500", "200-500"),
                    ("500+", "More than 500"),
                ]),
            ),
            Question::multi_choice(
                "salesProcess",
                "How do you sell?",
                options(&[
                    ("face-to-face", "Face to face"),
                    ("phone", "Phone"),
                    ("digital", "Online"),
                    ("events", "Events"),
                    ("whatsapp", "WhatsApp"),
                    ("email", "Email"),
                ]),
            ),
            Question::single_choice(
                "responseTime",
                "How fast do you reply to a new lead?",
                options(&[
                    ("immediate", "Immediately"),
                    ("1-24h", "Within a day"),
                    ("1-3d", "1-3 days"),
                    ("more", "Longer"),
                ]),
            ),
            yes_no(
                "hasKPIs",
                "Do you track sales KPIs?",
                "Yes, we measure",
                "No, not yet",
            ),
            Question::multiline(
                "unclosedLeadsProcess",
                "What happens to leads that did not close?",
            ),
            Question::flag("hasUpselling", "Do you upsell or cross-sell?"),
            Question::multiline("upsellingDetails", "How do you upsell today?")
                .shown_when("hasUpselling"),
        ],
    )
    .with_description("How leads turn into customers")
}

fn bot_needs() -> Step {
    Step::new(
        "Bot needs",
        vec![
            Question::multi_choice(
                "botGoals",
                "What should the bot do?",
                options(&[
                    ("answer-questions", "Answer common questions"),
                    ("collect-leads", "Collect lead details"),
                    ("book-meetings", "Book meetings"),
                    ("sell", "Sell products"),
                    ("support", "Provide support"),
                    ("follow-up", "Follow up with customers"),
                ]),
            ),
            Question::multi_choice(
                "availability",
                "Where should the bot be available?",
                options(&[
                    ("website", "Website"),
                    ("whatsapp", "WhatsApp"),
                    ("facebook", "Facebook Messenger"),
                    ("instagram", "Instagram"),
                    ("telegram", "Telegram"),
                ]),
            ),
            Question::rating(
                "priorities",
                "How important is each of these?",
                vec![
                    RatingStatement::new("speed", "Replying instantly"),
                    RatingStatement::new("personal", "A personal tone"),
                    RatingStatement::new("accuracy", "Accurate answers"),
                    RatingStatement::new("handoff", "Handing off to a person"),
                ],
            ),
            yes_no(
                "hasExistingContent",
                "Do you have existing content for the bot?",
                "Yes, we have content",
                "No, we will build it from scratch",
            ),
            Question::multiline("existingContentDetails", "Describe the existing content")
                .with_placeholder("FAQs, catalogs, guides...")
                .shown_when("hasExistingContent"),
            Question::multiline(
                "designPreferences",
                "Any design or technology preferences?",
            )
            .with_placeholder("Brand colors, design style, preferred platforms..."),
        ],
    )
    .with_description("What the bot should do for you")
}

fn experience() -> Step {
    Step::new(
        "Previous experience",
        vec![
            yes_no(
                "hasBotExperience",
                "Have you used bots or automation before?",
                "Yes, we have experience",
                "No, this will be the first",
            ),
            Question::multiline(
                "desiredUX",
                "What experience should customers have with the bot?",
            )
            .with_placeholder("How should customers feel? What matters to you in the experience?"),
        ],
    )
    .with_description("Tell us about your experience with automation")
}

#[cfg(test)]
mod tests {
    use intake::{AnswerStore, FieldKey, StepView, validate_all};

    use super::*;

    #[test]
    fn schema_is_well_formed() {
        business_intake().check().unwrap();
    }

    #[test]
    fn seven_question_steps_plus_intro_and_summary() {
        let q = business_intake();
        assert_eq!(q.total_steps(), 8);
        assert_eq!(q.step_at(0), Some(StepView::Intro));
        assert_eq!(q.step_at(8), Some(StepView::Summary));
    }

    #[test]
    fn only_contact_fields_are_required() {
        let required: Vec<_> = business_intake()
            .questions()
            .filter(|q| q.is_required())
            .map(|q| q.key().as_str().to_owned())
            .collect();
        assert_eq!(required, ["businessName", "contactName", "email"]);
    }

    #[test]
    fn upselling_details_follow_the_flag() -> anyhow::Result<()> {
        let q = business_intake();
        let mut answers = AnswerStore::new(&q);
        let details = q
            .question(&FieldKey::new("upsellingDetails"))
            .ok_or_else(|| anyhow::anyhow!("missing question"))?;

        assert!(!answers.is_visible(details));
        answers.set_flag("hasUpselling", Some(true))?;
        assert!(answers.is_visible(details));
        Ok(())
    }

    #[test]
    fn fresh_answers_only_miss_contact_fields() {
        let q = business_intake();
        let answers = AnswerStore::new(&q);
        let reports = validate_all(&q, &answers);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].step, 1);
        assert_eq!(reports[0].violations.len(), 3);
    }
}
