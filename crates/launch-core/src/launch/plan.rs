/// A fully resolved command line, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: String,
    pub argv: Vec<String>, // arguments only, without the program itself
}

impl LaunchPlan {
    /// Space-joined rendering for logs and `--dry-run`. Arguments are not quoted.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.argv {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}
