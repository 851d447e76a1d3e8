//! Static analysis checks
//!
//! The check table is shared by the GitHub and Bitrise assemblers; each turns
//! it into its own step records.

use crate::config::{PackageManager, StaticAnalysisOptions};
use crate::workflow::Step;

/// A single check: display title and shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisCheck {
    pub title: &'static str,
    pub command: &'static str,
}

const TYPESCRIPT: AnalysisCheck = AnalysisCheck {
    title: "TypeScript Check",
    command: "npx tsc --noEmit",
};

const ESLINT: AnalysisCheck = AnalysisCheck {
    title: "ESLint",
    command: "npx eslint . --ext .js,.jsx,.ts,.tsx",
};

const PRETTIER: AnalysisCheck = AnalysisCheck {
    title: "Prettier Check",
    command: "npx prettier --check \"**/*.{js,jsx,ts,tsx,json}\"",
};

fn unit_tests(package_manager: PackageManager) -> AnalysisCheck {
    AnalysisCheck {
        title: "Run Unit Tests",
        command: match package_manager {
            PackageManager::Npm => "npm test -- --watchAll=false",
            PackageManager::Yarn => "yarn test --watchAll=false",
        },
    }
}

/// Enabled checks in fixed order: typescript, eslint, prettier, unit tests
pub fn analysis_checks(
    checks: &StaticAnalysisOptions,
    package_manager: PackageManager,
) -> Vec<AnalysisCheck> {
    let mut enabled = Vec::new();
    if checks.typescript {
        enabled.push(TYPESCRIPT);
    }
    if checks.eslint {
        enabled.push(ESLINT);
    }
    if checks.prettier {
        enabled.push(PRETTIER);
    }
    if checks.unit_tests {
        enabled.push(unit_tests(package_manager));
    }
    enabled
}

pub fn analysis_steps(
    checks: &StaticAnalysisOptions,
    package_manager: PackageManager,
) -> Vec<Step> {
    analysis_checks(checks, package_manager)
        .into_iter()
        .map(|check| Step::run(check.title, check.command))
        .collect()
}
