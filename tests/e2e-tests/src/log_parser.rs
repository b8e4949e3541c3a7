/// Utilities for searching captured generator log output
pub struct LogParser {
    logs: Vec<String>,
}

impl LogParser {
    pub fn new(logs: Vec<String>) -> Self {
        Self { logs }
    }

    /// Check if logs contain a specific pattern
    pub fn contains(&self, pattern: &str) -> bool {
        self.logs.iter().any(|line| line.contains(pattern))
    }

    /// Count occurrences of a pattern
    pub fn count_occurrences(&self, pattern: &str) -> usize {
        self.logs.iter().filter(|line| line.contains(pattern)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.iter().all(|line| line.trim().is_empty())
    }

    /// Print all logs
    pub fn print_all(&self) {
        println!("\n=== Generator Logs ===");
        for (i, line) in self.logs.iter().enumerate() {
            println!("{:4}: {}", i + 1, line);
        }
        println!("======================\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LogParser {
        LogParser::new(vec![
            " INFO Starting zombie generator (window 2s)".to_string(),
            " INFO Forked child process parent=100 child=101".to_string(),
            " INFO Holding zombie for up to 2s without reaping child=101".to_string(),
            " INFO Reaped child 101 exited with code 0 child=101".to_string(),
        ])
    }

    #[test]
    fn test_log_parser_contains() {
        let parser = sample();
        assert!(parser.contains("Forked child process"));
        assert!(!parser.contains("Process creation failed"));
        assert!(!parser.is_empty());
    }

    #[test]
    fn test_count_occurrences() {
        let parser = sample();
        assert_eq!(parser.count_occurrences("child=101"), 3);
        assert_eq!(parser.count_occurrences("Reaped"), 1);
        assert_eq!(parser.count_occurrences("ERROR"), 0);
    }

    #[test]
    fn test_blank_output_is_empty() {
        assert!(LogParser::new(vec![]).is_empty());
        assert!(LogParser::new(vec!["".to_string(), "  ".to_string()]).is_empty());
    }
}
