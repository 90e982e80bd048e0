//! Call-stack reduction for query provenance.
//!
//! Raw execution stacks are dominated by framework plumbing. The filter
//! keeps the frames that identify the application code path issuing a
//! query, preserving order (most-recent-call-first) and capping the result
//! at the configured depth.
//!
//! Naive prefix filtering hides the real call site whenever the call goes
//! through a generated proxy or a repository implementation, both of which
//! live under framework namespaces. Rules 2 and 3 below restore those
//! frames; rule 1 takes precedence over both so query-interception and
//! transaction plumbing never leak through.

use crate::config::AnalysisConfig;
use crate::model::StackFrame;

/// Applies the frame-attribution rule table from an [`AnalysisConfig`].
#[derive(Debug, Clone)]
pub struct StackFilter {
    max_depth: usize,
    hard_excluded_prefixes: Vec<String>,
    proxy_markers: Vec<String>,
    repository_prefixes: Vec<String>,
    excluded_prefixes: Vec<String>,
}

impl StackFilter {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            max_depth: config.max_stack_depth,
            hard_excluded_prefixes: config.hard_excluded_prefixes.clone(),
            proxy_markers: config.proxy_markers.clone(),
            repository_prefixes: config.repository_prefixes.clone(),
            excluded_prefixes: config.excluded_prefixes.clone(),
        }
    }

    /// Reduce a raw stack to its application-relevant frames, in original
    /// order, at most `max_stack_depth` long.
    pub fn filter(&self, raw_frames: &[StackFrame]) -> Vec<StackFrame> {
        raw_frames
            .iter()
            .filter(|frame| self.is_application_frame(frame))
            .take(self.max_depth)
            .cloned()
            .collect()
    }

    /// Per-frame decision, evaluated in precedence order.
    fn is_application_frame(&self, frame: &StackFrame) -> bool {
        let type_name = frame.declaring_type.as_str();

        // 1. Infrastructure that must never appear, even when a later rule
        // would include it.
        if self.starts_with_any(type_name, &self.hard_excluded_prefixes) {
            return false;
        }

        // 2. Generated proxies and subclasses are the actual call site.
        if self
            .proxy_markers
            .iter()
            .any(|marker| type_name.contains(marker.as_str()))
        {
            return true;
        }

        // 3. Repository implementations, despite their framework namespace.
        if self.starts_with_any(type_name, &self.repository_prefixes) {
            return true;
        }

        // 4. General infrastructure namespaces.
        if self.starts_with_any(type_name, &self.excluded_prefixes) {
            return false;
        }

        // 5. Presumed application code.
        true
    }

    fn starts_with_any(&self, type_name: &str, prefixes: &[String]) -> bool {
        prefixes
            .iter()
            .any(|prefix| type_name.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(declaring_type: &str) -> StackFrame {
        StackFrame::new(declaring_type, format!("{declaring_type}.call(Source:1)"))
    }

    fn filter_with_depth(max_depth: usize) -> StackFilter {
        let config = AnalysisConfig {
            max_stack_depth: max_depth,
            ..AnalysisConfig::default()
        };
        StackFilter::new(&config)
    }

    #[test]
    fn keeps_application_frames_and_drops_infrastructure() {
        let filter = filter_with_depth(10);
        let raw = vec![
            frame("org.hibernate.query.Query"),
            frame("com.example.testapp.repository.UserRepositoryImpl"),
            frame("org.springframework.web.servlet.DispatcherServlet"),
            frame("com.example.testapp.controller.UserController"),
            frame("java.lang.Thread"),
        ];
        let filtered = filter.filter(&raw);
        let types: Vec<&str> = filtered.iter().map(|f| f.declaring_type.as_str()).collect();
        assert_eq!(
            types,
            vec![
                "com.example.testapp.repository.UserRepositoryImpl",
                "com.example.testapp.controller.UserController",
            ]
        );
    }

    #[test]
    fn proxy_frames_are_kept() {
        let filter = filter_with_depth(10);
        let raw = vec![
            frame("jdk.proxy2.$Proxy127"),
            frame("com.example.testapp.service.OrderService$$SpringCGLIB$$0"),
            frame("com.example.testapp.service.OrderService"),
        ];
        let filtered = filter.filter(&raw);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn repository_support_frames_are_kept_despite_framework_prefix() {
        let filter = filter_with_depth(10);
        let raw = vec![
            frame("org.springframework.data.jpa.repository.support.SimpleJpaRepository"),
            frame("org.springframework.data.jpa.repository.query.JpaQueryExecution"),
        ];
        let filtered = filter.filter(&raw);
        assert_eq!(filtered.len(), 1);
        assert_eq!(
            filtered[0].declaring_type,
            "org.springframework.data.jpa.repository.support.SimpleJpaRepository"
        );
    }

    #[test]
    fn hard_exclusions_win_over_proxy_markers() {
        let filter = filter_with_depth(10);
        // A weaving-infrastructure frame whose name also carries a proxy
        // marker must still be dropped.
        let raw = vec![
            frame("org.springframework.aop.framework.CglibAopProxy$$Lambda"),
            frame("net.ttddyy.dsproxy.proxy.StatementProxyLogic"),
            frame("com.example.testapp.web.UserHandler"),
        ];
        let filtered = filter.filter(&raw);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].declaring_type, "com.example.testapp.web.UserHandler");
    }

    #[test]
    fn result_never_exceeds_configured_depth() {
        let filter = filter_with_depth(10);
        let raw: Vec<StackFrame> = (0..40)
            .map(|i| frame(&format!("com.example.testapp.Layer{i}")))
            .collect();
        let filtered = filter.filter(&raw);
        assert_eq!(filtered.len(), 10);
        assert_eq!(filtered[0].declaring_type, "com.example.testapp.Layer0");
    }

    #[test]
    fn ordering_is_preserved() {
        let filter = filter_with_depth(10);
        let raw = vec![
            frame("com.example.testapp.a.First"),
            frame("org.apache.catalina.core.ApplicationFilterChain"),
            frame("com.example.testapp.b.Second"),
        ];
        let filtered = filter.filter(&raw);
        let types: Vec<&str> = filtered.iter().map(|f| f.declaring_type.as_str()).collect();
        assert_eq!(
            types,
            vec!["com.example.testapp.a.First", "com.example.testapp.b.Second"]
        );
    }
}
