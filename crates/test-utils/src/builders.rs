use std::path::PathBuf;

use voidjob::config::{
    ConfigFile, EnvironmentSection, JobSection, ProgramSection, RawConfigFile, ResourcesSection,
};
use voidjob::errors::Result;

/// Builds validated job configs without going through a TOML file.
///
/// Starts from the production job: 200G, one hour, one task, mail on all
/// events, no environment preparation.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                job: JobSection {
                    name: "vsquared".to_string(),
                    working_dir: None,
                    output: "%x-%j.out".to_string(),
                    error: "%x-%j.err".to_string(),
                    partition: None,
                    account: None,
                },
                resources: ResourcesSection {
                    memory: "200G".to_string(),
                    time: "01:00:00".to_string(),
                    ntasks: 1,
                    mail_type: "all".to_string(),
                    mail_user: None,
                },
                environment: EnvironmentSection::default(),
                program: ProgramSection {
                    path: PathBuf::from("/opt/vast/bin/vsquared"),
                    srun: false,
                },
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.config.job.name = name.to_string();
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.job.working_dir = Some(dir.into());
        self
    }

    pub fn memory(mut self, memory: &str) -> Self {
        self.config.resources.memory = memory.to_string();
        self
    }

    pub fn time(mut self, time: &str) -> Self {
        self.config.resources.time = time.to_string();
        self
    }

    pub fn ntasks(mut self, ntasks: u32) -> Self {
        self.config.resources.ntasks = ntasks;
        self
    }

    pub fn mail_type(mut self, mail_type: &str) -> Self {
        self.config.resources.mail_type = mail_type.to_string();
        self
    }

    pub fn program(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.program.path = path.into();
        self
    }

    pub fn srun(mut self, srun: bool) -> Self {
        self.config.program.srun = srun;
        self
    }

    pub fn shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.config.environment.shell = shell.into();
        self
    }

    pub fn module(mut self, module: &str) -> Self {
        self.config.environment.modules.push(module.to_string());
        self
    }

    pub fn command(mut self, command: &str) -> Self {
        self.config.environment.commands.push(command.to_string());
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.config.environment.fail_fast = fail_fast;
        self
    }

    /// Validate without panicking, for tests that expect a rejection.
    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("builder defaults plus overrides should validate")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
