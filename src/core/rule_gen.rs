// src/core/rule_gen.rs

//! Per-file preprocess and render rules.

use crate::{
    constants::{BODY_SUFFIX, RENDERED_SUFFIX, RULE_SOURCE_SUFFIX},
    core::{
        config::RuleOptions,
        layout::{Layout, LayoutError, to_posix},
        metadata::MetadataSource,
    },
};
use std::path::Path;

/// Generates the make rules for one `.yml` sidecar file.
///
/// The first rule preprocesses the sidecar into the build tree; the second
/// renders the preprocessed body into HTML and then checks the output for
/// unexpanded template syntax. The render rule also depends on the template
/// (the document's `html.template` or the configured default) and on the
/// corpus-wide preprocessing barrier.
///
/// ```text
/// build/foo/bar.yml: src/foo/bar.yml
///     $(Q)mkdir -p $(dir build/foo/bar.yml)
///     ...
/// build/foo/bar.html: build/foo/bar.md build/foo/bar.yml $(DEFAULT_TEMPLATE) build/.preprocessed
///     ...
/// ```
pub fn generate_rule(
    input: &Path,
    layout: &Layout,
    options: &RuleOptions,
    loader: &dyn MetadataSource,
) -> Result<String, LayoutError> {
    let output_html = layout.build_path_with_suffix(input, RENDERED_SUFFIX)?;
    let preprocessed_md = layout.build_path_with_suffix(input, BODY_SUFFIX)?;
    let preprocessed_yml = layout.build_path_with_suffix(input, RULE_SOURCE_SUFFIX)?;
    let source = to_posix(input);
    let barrier = to_posix(&layout.build_root.join(&options.barrier));

    let template = match loader.load(input) {
        Ok(Some(metadata)) => metadata
            .template_override()
            .map(str::to_string)
            .unwrap_or_else(|| options.default_template.clone()),
        Ok(None) => options.default_template.clone(),
        Err(e) => {
            log::warn!(
                "Failed to load metadata for '{}', using the default template: {}",
                source,
                e
            );
            options.default_template.clone()
        }
    };

    Ok(format!(
        "\n\
         {preprocessed_yml}: {source}\n\
         \t$(Q)mkdir -p $(dir {preprocessed_yml})\n\
         \t$(Q)emojify < $< > $@\n\
         \t$(Q)process-yaml $< $@\n\
         {output_html}: {preprocessed_md} {preprocessed_yml} {template} {barrier}\n\
         \t$(Q)$(PANDOC_CMD) $(PANDOC_OPTS) --template={template} --metadata-file={preprocessed_yml} -o $@ $<\n\
         \t$(Q)check-unexpanded-jinja $@"
    ))
}
