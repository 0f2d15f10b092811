//! CI pipeline generation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fledge_core::{
    application::{ApplicationError, ports::{CiGenerator, Filesystem}},
    domain::{CiProvider, RenderContext},
    error::{FledgeError, FledgeResult},
};
use tracing::instrument;

/// Where each provider expects its pipeline, relative to the project root.
pub fn pipeline_path(provider: CiProvider) -> &'static str {
    match provider {
        CiProvider::GitHub => ".github/workflows/ci.yml",
        CiProvider::GitLab => ".gitlab-ci.yml",
        CiProvider::Bitbucket => "bitbucket-pipelines.yml",
    }
}

const GITHUB: &str = "\
name: {{APP_NAME}} CI

on:
  push:
    branches: [main]
  pull_request:

jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: subosito/flutter-action@v2
        with:
          channel: stable
      - run: flutter pub get
      - run: flutter analyze
      - run: flutter test
";

const GITLAB: &str = "\
image: ghcr.io/cirruslabs/flutter:stable

stages:
  - test

test:
  stage: test
  script:
    - flutter pub get
    - flutter analyze
    - flutter test
";

const BITBUCKET: &str = "\
image: ghcr.io/cirruslabs/flutter:stable

pipelines:
  default:
    - step:
        name: {{APP_NAME}} tests
        script:
          - flutter pub get
          - flutter analyze
          - flutter test
";

/// Renders the built-in pipeline for a provider and writes it through the
/// [`Filesystem`] port.
#[derive(Clone)]
pub struct TemplateCiGenerator {
    filesystem: Arc<dyn Filesystem>,
}

impl TemplateCiGenerator {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    fn write(&self, target: &Path, body: &str) -> FledgeResult<()> {
        if let Some(parent) = target.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(target, body)
    }
}

impl CiGenerator for TemplateCiGenerator {
    #[instrument(skip(self, context))]
    fn generate(&self, provider: CiProvider, context: &RenderContext) -> FledgeResult<PathBuf> {
        let template = match provider {
            CiProvider::GitHub => GITHUB,
            CiProvider::GitLab => GITLAB,
            CiProvider::Bitbucket => BITBUCKET,
        };
        let target = context.output_dir().join(pipeline_path(provider));

        self.write(&target, &context.render(template))
            .map_err(|e| -> FledgeError {
                ApplicationError::CiGenerationFailed {
                    provider: provider.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })?;
        Ok(target)
    }
}
