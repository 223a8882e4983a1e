//! Canned suggestion gateway with simulated latency.

use std::time::Duration;

use async_trait::async_trait;
use minijinja::{Environment, context};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::board::{
    domain::TaskPriority,
    ports::{GatewayError, GatewayResult, SuggestionGateway, SuggestionRecord},
};

const IMPROVEMENT_TEMPLATES: [(&str, &str); 4] = [
    (
        "break-down",
        r#"Break down "{{ title }}" into smaller, actionable steps with clear acceptance criteria"#,
    ),
    (
        "dependencies",
        r#"Consider the impact and dependencies when working on "{{ title }}""#,
    ),
    (
        "testing",
        r#"Ensure proper testing and documentation for "{{ title }}""#,
    ),
    (
        "prior-art",
        r#"Review similar implementations before starting "{{ title }}""#,
    ),
];

const NEXT_ACTIONS: [&str; 4] = [
    "Review and test the implementation",
    "Update related documentation",
    "Notify team members of completion",
    "Plan follow-up tasks if needed",
];

/// Simulated response times for each gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    /// Delay before suggestions are returned.
    pub generate: Duration,
    /// Delay before a description improvement is returned.
    pub improve: Duration,
    /// Delay before next actions are returned.
    pub next_actions: Duration,
}

impl MockLatency {
    /// No delay at all.
    pub const NONE: Self = Self {
        generate: Duration::ZERO,
        improve: Duration::ZERO,
        next_actions: Duration::ZERO,
    };
}

impl Default for MockLatency {
    fn default() -> Self {
        Self {
            generate: Duration::from_millis(1500),
            improve: Duration::from_millis(1000),
            next_actions: Duration::from_millis(800),
        }
    }
}

/// Suggestion gateway returning fixed content.
///
/// Improvement hints are chosen from a small template set using a digest of
/// the title, so the same title always yields the same hint.
#[derive(Debug)]
pub struct MockSuggestionGateway {
    latency: MockLatency,
    templates: Environment<'static>,
}

impl MockSuggestionGateway {
    /// Creates a gateway with the given latency profile.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Render`] if a built-in template fails to
    /// compile.
    pub fn new(latency: MockLatency) -> GatewayResult<Self> {
        let mut templates = Environment::new();
        for (name, source) in IMPROVEMENT_TEMPLATES {
            templates
                .add_template(name, source)
                .map_err(|err| GatewayError::Render(err.to_string()))?;
        }
        Ok(Self { latency, templates })
    }

    /// Returns the configured latency profile.
    #[must_use]
    pub const fn latency(&self) -> MockLatency {
        self.latency
    }

    fn template_for(title: &str) -> &'static str {
        let digest = Sha256::digest(title.as_bytes());
        let first = usize::from(digest.first().copied().unwrap_or_default());
        let index = first
            .checked_rem(IMPROVEMENT_TEMPLATES.len())
            .unwrap_or_default();
        IMPROVEMENT_TEMPLATES
            .get(index)
            .map_or("break-down", |(name, _)| *name)
    }
}

async fn simulate(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

fn canned_suggestions() -> Vec<SuggestionRecord> {
    vec![
        suggestion(
            "ai-1",
            "Optimize database queries",
            "Review and optimize slow-running database queries for better performance",
            TaskPriority::High,
            120,
            &["database", "performance"],
        ),
        suggestion(
            "ai-2",
            "Add error logging",
            "Implement comprehensive error logging and monitoring",
            TaskPriority::Medium,
            90,
            &["monitoring", "debugging"],
        ),
        suggestion(
            "ai-3",
            "Update dependencies",
            "Review and update outdated npm packages for security",
            TaskPriority::Medium,
            60,
            &["maintenance", "security"],
        ),
        suggestion(
            "ai-4",
            "Write unit tests",
            "Increase test coverage for core functionality",
            TaskPriority::Low,
            180,
            &["testing", "quality"],
        ),
    ]
}

fn suggestion(
    id: &str,
    title: &str,
    description: &str,
    priority: TaskPriority,
    estimated_time: u32,
    tags: &[&str],
) -> SuggestionRecord {
    SuggestionRecord {
        id: id.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        priority,
        estimated_time: Some(estimated_time),
        tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
    }
}

#[async_trait]
impl SuggestionGateway for MockSuggestionGateway {
    async fn generate_suggestions(&self, context: &str) -> GatewayResult<Vec<SuggestionRecord>> {
        debug!(context, "generating canned suggestions");
        simulate(self.latency.generate).await;
        Ok(canned_suggestions())
    }

    async fn improve_description(
        &self,
        title: &str,
        _description: Option<&str>,
    ) -> GatewayResult<String> {
        simulate(self.latency.improve).await;
        let name = Self::template_for(title);
        self.templates
            .get_template(name)
            .and_then(|template| template.render(context! { title }))
            .map_err(|err| GatewayError::Render(err.to_string()))
    }

    async fn suggest_next_actions(&self, completed_title: &str) -> GatewayResult<Vec<String>> {
        debug!(completed_title, "suggesting next actions");
        simulate(self.latency.next_actions).await;
        Ok(NEXT_ACTIONS.iter().map(|action| (*action).to_owned()).collect())
    }
}
