use serde::Serialize;

const ACTIVITIES: &[&str] = &[
    "Take part in choosing the technologies used to build the systems",
    "Write systems and applications following the team's standards and methodologies",
    "Estimate task effort from requirements documents",
    "Build systems with the technologies chosen by the team",
    "Comment and document the code you write",
    "Write and run unit tests",
    "Fix bugs in existing systems and applications",
];

const PREREQUISITES: &[&str] = &[
    "Knowledge of Python and Java",
    "Experience with frameworks such as Django",
    "Familiarity with Docker, Git and Postgres databases",
    "Knowledge of agile methods, Scrum in particular",
    "Available to work on site in Florianópolis, SC",
];

const DIFFERENTIALS: &[&str] = &[
    "Knowledge of Flutter",
    "Experience with Django Rest Framework or Flask",
    "Hands-on work with CI/CD pipelines",
    "Familiarity with cloud architecture (AWS API Gateway, Lambda Functions)",
    "Experience with microservices, RabbitMQ, event sourcing and NoSQL stores such as MongoDB",
];

/// Suggested structure for a job description, shown next to the description field.
#[derive(Debug, Clone, Serialize)]
pub struct JobTemplate {
    pub activities: Vec<&'static str>,
    pub prerequisites: Vec<&'static str>,
    pub differentials: Vec<&'static str>,
    /// The three sections rendered as one pre-fillable description.
    pub text: String,
}

pub fn job_template() -> JobTemplate {
    let text = [
        ("Activities", ACTIVITIES),
        ("Prerequisites", PREREQUISITES),
        ("Differentials", DIFFERENTIALS),
    ]
    .iter()
    .map(|(heading, items)| format!("{heading}:\n{}\n", items.join("\n")))
    .collect::<Vec<_>>()
    .join("\n");

    JobTemplate {
        activities: ACTIVITIES.to_vec(),
        prerequisites: PREREQUISITES.to_vec(),
        differentials: DIFFERENTIALS.to_vec(),
        text,
    }
}
