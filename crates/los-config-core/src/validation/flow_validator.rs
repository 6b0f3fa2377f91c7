use std::collections::{HashMap, HashSet};
use crate::flow::{is_flow_end, FlowConfig};
use crate::validation::{error_codes, FlowContext, ValidationIssue, Validator};

/// Validates flow structure: unique screen ids, cycles and reachability
pub struct FlowValidator {
    // Could hold configuration if needed
}

/// Traversal state of a node during cycle detection
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnStack,
    Done,
}

impl FlowValidator {
    /// Create a new flow validator
    pub fn new() -> Self {
        FlowValidator {}
    }

    /// Adjacency list over the flow's own nodes.
    ///
    /// Targets that are the end sentinel are dropped; targets that are not
    /// nodes of the flow stay in the list but are never expanded. The first
    /// node wins when ids are duplicated.
    fn build_graph(flow: &FlowConfig) -> HashMap<&str, Vec<&str>> {
        let mut graph = HashMap::with_capacity(flow.screens.len());
        for node in &flow.screens {
            graph.entry(node.screen_id.as_str()).or_insert_with(|| {
                node.targets().filter(|target| !is_flow_end(target)).collect()
            });
        }
        graph
    }

    /// Validate that a flow has unique screen IDs
    ///
    /// Returns one error per duplicated ID, in first-seen order
    fn validate_unique_screen_ids(&self, flow: &FlowConfig) -> Vec<ValidationIssue> {
        let mut errors = Vec::new();
        let mut screen_ids = HashSet::with_capacity(flow.screens.len());
        let mut duplicate_ids: Vec<&str> = Vec::new();

        for node in &flow.screens {
            if !screen_ids.insert(node.screen_id.as_str()) && !duplicate_ids.contains(&node.screen_id.as_str()) {
                duplicate_ids.push(node.screen_id.as_str());
            }
        }

        for duplicate_id in duplicate_ids {
            errors.push(ValidationIssue::new(
                error_codes::DUPLICATE_ID,
                format!("Duplicate screen ID: '{}' - screen IDs must be unique within a flow", duplicate_id),
                Some("screens".to_string()),
            ));
        }

        errors
    }

    /// Detects a circular route reachable from the start screen
    ///
    /// Depth-first search with an explicit stack, so pathological graphs cannot
    /// exhaust the call stack. Reports a single error for the first cycle found.
    fn detect_circular_dependencies(&self, flow: &FlowConfig) -> Vec<ValidationIssue> {
        let graph = Self::build_graph(flow);
        let start = flow.start_screen.trim();

        match Self::find_cycle(start, &graph) {
            Some(cycle) => {
                // Format the cycle as A → B → C → A
                let mut formatted = cycle.join(" → ");
                if let Some(first) = cycle.first() {
                    formatted.push_str(" → ");
                    formatted.push_str(first);
                }
                vec![ValidationIssue::new(
                    error_codes::CIRCULAR_DEPENDENCY,
                    format!("Circular dependency detected in screen routes: {}", formatted),
                    Some("screens".to_string()),
                )]
            }
            None => Vec::new(),
        }
    }

    /// Returns the nodes forming the first cycle met while walking from `start`
    fn find_cycle<'a>(start: &'a str, graph: &HashMap<&'a str, Vec<&'a str>>) -> Option<Vec<&'a str>> {
        if !graph.contains_key(start) {
            return None;
        }

        let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(graph.len());
        // Each frame is a node and the index of its next edge to follow
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
        marks.insert(start, Mark::OnStack);

        while let Some(frame) = stack.last_mut() {
            let (node, edge_idx) = *frame;
            let edges = &graph[node];

            if edge_idx >= edges.len() {
                marks.insert(node, Mark::Done);
                stack.pop();
                continue;
            }
            frame.1 += 1;

            let next = edges[edge_idx];
            if !graph.contains_key(next) {
                continue;
            }
            match marks.get(next) {
                Some(Mark::OnStack) => {
                    let cycle_start = stack.iter().position(|(n, _)| *n == next).unwrap_or(0);
                    return Some(stack[cycle_start..].iter().map(|(n, _)| *n).collect());
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(next, Mark::OnStack);
                    stack.push((next, 0));
                }
            }
        }

        None
    }

    /// Warn about screens no route from the start screen reaches
    fn detect_unreachable_screens(&self, flow: &FlowConfig) -> Vec<ValidationIssue> {
        let graph = Self::build_graph(flow);
        let start = flow.start_screen.trim();

        // Without a valid entry every node would be reported; the start errors cover it
        if !graph.contains_key(start) {
            return Vec::new();
        }

        let mut reached: HashSet<&str> = HashSet::with_capacity(graph.len());
        let mut pending = vec![start];
        while let Some(node) = pending.pop() {
            if !reached.insert(node) {
                continue;
            }
            if let Some(edges) = graph.get(node) {
                pending.extend(edges.iter().copied().filter(|n| graph.contains_key(n)));
            }
        }

        flow.screens
            .iter()
            .enumerate()
            .filter(|(_, node)| !reached.contains(node.screen_id.as_str()))
            .map(|(idx, node)| {
                ValidationIssue::warning(
                    error_codes::UNREACHABLE_SCREEN,
                    format!("Screen '{}' is not reachable from start screen '{}'", node.screen_id, start),
                    Some(format!("screens[{}]", idx)),
                )
            })
            .collect()
    }
}

impl Default for FlowValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for FlowValidator {
    fn validate(&self, context: &FlowContext<'_>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        // Check for unique screen IDs
        issues.extend(self.validate_unique_screen_ids(context.flow));

        // Check for circular routes
        issues.extend(self.detect_circular_dependencies(context.flow));

        // Check reachability
        issues.extend(self.detect_unreachable_screens(context.flow));

        issues
    }
}
