//! Story skeleton rendering.

use handlebars::Handlebars;
use serde::{Deserialize, Serialize};

use crate::id::StoryId;

const STORY_TEMPLATE: &str = r#"## ID

story.{{subsystem}}.{{verb}}

## Type

{{storyType}}

## Purpose

{{purpose}}

## Inputs

{{inputs}}

## Outputs

{{outputs}}

## Behavior

{{behavior}}

## Existing Implementation

{{existingImplementation}}

## As Implemented

{{asImplemented}}

## Intended Behavior

{{intendedBehavior}}

## Constraints

{{constraints}}

## Errors

{{errors}}

## Dependencies

{{dependencies}}

## Tests

{{tests}}

## Open Questions

{{openQuestions}}
"#;

const UNKNOWN: &str = "Unknown. See Open Questions.";

const MINIMAL_QUESTIONS: &str = "- Q1: What is the purpose of this operation?
- Q2: What are the inputs?
- Q3: What are the outputs?
- Q4: What is the expected behavior?
- Q5: What errors can occur?";

const DEFAULT_TESTS: &str = "### Happy path
- Given: (setup)
- When: (action)
- Then: (expected result)

### Error case
- Given: (setup for error)
- When: (action)
- Then: (expected error)";

/// Values substituted into the story skeleton.
///
/// `subsystem` and `verb` are required. Any other field left as `None` or an
/// empty string is replaced by its placeholder text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoryTemplateVars {
    pub subsystem: String,
    pub verb: String,
    pub story_type: Option<String>,
    pub purpose: Option<String>,
    pub inputs: Option<String>,
    pub outputs: Option<String>,
    pub behavior: Option<String>,
    pub existing_implementation: Option<String>,
    pub as_implemented: Option<String>,
    pub intended_behavior: Option<String>,
    pub constraints: Option<String>,
    pub errors: Option<String>,
    pub dependencies: Option<String>,
    pub tests: Option<String>,
    pub open_questions: Option<String>,
}

impl StoryTemplateVars {
    /// Vars for the given identifier with every optional field unset.
    pub fn for_id(id: &StoryId) -> Self {
        Self {
            subsystem: id.subsystem().to_string(),
            verb: id.verb().to_string(),
            ..Self::default()
        }
    }

    /// Fill unset fields with their placeholder text.
    fn resolved(&self) -> ResolvedVars<'_> {
        fn pick<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
            value.as_deref().filter(|v| !v.is_empty()).unwrap_or(default)
        }

        ResolvedVars {
            subsystem: &self.subsystem,
            verb: &self.verb,
            story_type: pick(&self.story_type, "operation"),
            purpose: pick(&self.purpose, "(One sentence: what does this operation do?)"),
            inputs: pick(&self.inputs, "- (parameter): (type) — (description)"),
            outputs: pick(&self.outputs, "- (return): (type) — (description)"),
            behavior: pick(&self.behavior, "1. (Step one)\n2. (Step two)\n3. (Step three)"),
            existing_implementation: pick(
                &self.existing_implementation,
                "Paths:\n- (path)\n\nNotes:\n- (notes)",
            ),
            as_implemented: pick(&self.as_implemented, "(Describe current behavior as implemented)"),
            intended_behavior: pick(
                &self.intended_behavior,
                "(Describe desired behavior if different from current)",
            ),
            constraints: pick(&self.constraints, "- (Any limits, invariants, or preconditions)"),
            errors: pick(&self.errors, "- (ErrorName): when (condition)"),
            dependencies: pick(&self.dependencies, "(None)"),
            tests: pick(&self.tests, DEFAULT_TESTS),
            open_questions: pick(&self.open_questions, "- Q1: (unresolved question)"),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolvedVars<'a> {
    subsystem: &'a str,
    verb: &'a str,
    story_type: &'a str,
    purpose: &'a str,
    inputs: &'a str,
    outputs: &'a str,
    behavior: &'a str,
    existing_implementation: &'a str,
    as_implemented: &'a str,
    intended_behavior: &'a str,
    constraints: &'a str,
    errors: &'a str,
    dependencies: &'a str,
    tests: &'a str,
    open_questions: &'a str,
}

/// Template errors
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Missing template variable: {0}")]
    MissingVariable(&'static str),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

fn renderer() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    // Story bodies are markdown, not HTML.
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
}

/// Render the full story skeleton.
pub fn render_story_template(vars: &StoryTemplateVars) -> Result<String, TemplateError> {
    if vars.subsystem.is_empty() {
        return Err(TemplateError::MissingVariable("subsystem"));
    }
    if vars.verb.is_empty() {
        return Err(TemplateError::MissingVariable("verb"));
    }

    let rendered = renderer().render_template(STORY_TEMPLATE, &vars.resolved())?;
    Ok(rendered)
}

/// Render an operation story whose every section defers to five open questions.
pub fn render_minimal_story(id: &StoryId) -> Result<String, TemplateError> {
    let unknown = || Some(UNKNOWN.to_string());
    let vars = StoryTemplateVars {
        story_type: Some("operation".to_string()),
        purpose: unknown(),
        inputs: unknown(),
        outputs: unknown(),
        behavior: unknown(),
        existing_implementation: unknown(),
        as_implemented: unknown(),
        intended_behavior: unknown(),
        constraints: unknown(),
        errors: unknown(),
        dependencies: unknown(),
        tests: unknown(),
        open_questions: Some(MINIMAL_QUESTIONS.to_string()),
        ..StoryTemplateVars::for_id(id)
    };
    render_story_template(&vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_story;
    use crate::parsing::{parse_story, ALL_SECTIONS};
    use crate::validate::{validate_story_content, ValidationOptions};

    fn id() -> StoryId {
        StoryId::parse("story.storage.read").unwrap()
    }

    #[test]
    fn test_render_defaults() {
        let rendered = render_story_template(&StoryTemplateVars::for_id(&id())).unwrap();
        let parsed = parse_story(&rendered);

        assert_eq!(parsed.extract_id(), Some("story.storage.read"));
        assert_eq!(parsed.declared_type(), "operation");
        assert_eq!(parsed.get("Dependencies"), Some("(None)"));
        assert_eq!(parsed.get("Outputs"), Some("- (return): (type) — (description)"));
        assert_eq!(parsed.get("Open Questions"), Some("- Q1: (unresolved question)"));
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.len(), ALL_SECTIONS.len());
    }

    #[test]
    fn test_render_uses_supplied_values() {
        let vars = StoryTemplateVars {
            story_type: Some("endpoint".to_string()),
            purpose: Some("Serve <b>blobs</b> & more".to_string()),
            inputs: Some(String::new()),
            ..StoryTemplateVars::for_id(&id())
        };
        let parsed = parse_story(&render_story_template(&vars).unwrap());

        assert_eq!(parsed.declared_type(), "endpoint");
        assert_eq!(parsed.get("Purpose"), Some("Serve <b>blobs</b> & more"));
        assert_eq!(parsed.get("Inputs"), Some("- (parameter): (type) — (description)"));
    }

    #[test]
    fn test_render_requires_subsystem_and_verb() {
        let err = render_story_template(&StoryTemplateVars::default()).unwrap_err();
        assert!(matches!(err, TemplateError::MissingVariable("subsystem")));

        let vars = StoryTemplateVars {
            subsystem: "storage".to_string(),
            ..Default::default()
        };
        let err = render_story_template(&vars).unwrap_err();
        assert_eq!(err.to_string(), "Missing template variable: verb");
    }

    #[test]
    fn test_minimal_story_analysis() {
        let rendered = render_minimal_story(&id()).unwrap();
        let analysis = analyze_story(&rendered);

        assert_eq!(analysis.id.as_deref(), Some("story.storage.read"));
        assert!(analysis.missing.is_empty());
        assert_eq!(analysis.open_questions, 5);
        assert!(!analysis.complete);
        assert!(analysis.errors.is_empty());
    }

    #[test]
    fn test_minimal_story_passes_content_gate() {
        let rendered = render_minimal_story(&id()).unwrap();
        let options = ValidationOptions {
            name_constraint: Some("storage.read".to_string()),
            open_questions: vec!["Q5: What errors can occur?".to_string()],
            ..Default::default()
        };
        let result = validate_story_content(&rendered, &options);
        assert!(result.valid, "{:?}", result.errors);
    }
}
