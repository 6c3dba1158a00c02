use crate::assets::get_narrative_text;
use crate::config::NarrativeConfig;
use serde::Serialize;

/// Closing section describing how a request moves through the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNarrative {
    pub heading: String,
    pub intro: String,
    pub steps: Vec<String>,
    pub connections_heading: String,
    pub connections: Vec<String>,
}

impl Default for FlowNarrative {
    fn default() -> Self {
        let text = get_narrative_text();
        Self {
            heading: text.flow_heading.clone(),
            intro: text.flow_intro.clone(),
            steps: text.steps.clone(),
            connections_heading: text.connections_heading.clone(),
            connections: text.connections.clone(),
        }
    }
}

impl FlowNarrative {
    /// Embedded text with any configured overrides applied. `None` when disabled.
    pub fn from_config(config: &NarrativeConfig) -> Option<Self> {
        if !config.enabled {
            log::debug!("Flow narrative disabled");
            return None;
        }
        let mut narrative = Self::default();
        if let Some(heading) = &config.heading {
            narrative.heading = heading.clone();
        }
        if let Some(intro) = &config.intro {
            narrative.intro = intro.clone();
        }
        if let Some(steps) = &config.steps {
            narrative.steps = steps.clone();
        }
        if let Some(heading) = &config.connections_heading {
            narrative.connections_heading = heading.clone();
        }
        if let Some(connections) = &config.connections {
            narrative.connections = connections.clone();
        }
        Some(narrative)
    }
}

pub fn default_title() -> &'static str {
    &get_narrative_text().title
}

pub fn default_intro() -> &'static str {
    &get_narrative_text().intro
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_narrative_has_fixed_steps() {
        let narrative = FlowNarrative::from_config(&NarrativeConfig::default()).unwrap();
        assert_eq!(narrative.steps.len(), 9);
        assert_eq!(narrative.connections.len(), 5);
        assert_eq!(narrative.connections_heading, "How parts connect");
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let config = NarrativeConfig {
            heading: Some("Request lifecycle".into()),
            steps: Some(vec!["Receive".into(), "Respond".into()]),
            ..NarrativeConfig::default()
        };
        let narrative = FlowNarrative::from_config(&config).unwrap();
        assert_eq!(narrative.heading, "Request lifecycle");
        assert_eq!(narrative.steps, vec!["Receive", "Respond"]);
        assert_eq!(narrative.connections.len(), 5);
    }

    #[test]
    fn disabled_narrative_is_none() {
        let config = NarrativeConfig {
            enabled: false,
            ..NarrativeConfig::default()
        };
        assert!(FlowNarrative::from_config(&config).is_none());
    }
}
