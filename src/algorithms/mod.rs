/*!

The built-in routing algorithms and the registry that resolves a name
from the network file header or the CLI into a boxed pair of
[`crate::algorithm::RoutingAlgorithm`]/[`crate::algorithm::RobotAlgorithm`]
implementations.

*/

pub mod bellman_ford;
pub mod random_walk;
pub mod template;

use crate::algorithm::{RobotAlgorithm, RoutingAlgorithm};
use crate::error::Error;

/// Resolves an algorithm name to its routing/robot implementation pair.
/// Matching is case-insensitive; `"template"` is the pass-through/bounce
/// reference algorithm, `"bmf"` is Bellman-Ford distance-vector routing,
/// `"randomwalk"` is the bounded random walk.
pub fn by_name(name: &str) -> Result<(Box<dyn RoutingAlgorithm>, Box<dyn RobotAlgorithm>), Error> {
	match name.to_ascii_lowercase().as_str() {
		"template" => Ok((
			Box::new(template::TemplateRoutingAlgorithm),
			Box::new(template::TemplateRobotAlgorithm),
		)),
		"bmf" | "bellmanford" => Ok((
			Box::new(bellman_ford::BellmanFordRouting),
			Box::new(bellman_ford::BellmanFordRobot::new()),
		)),
		"randomwalk" => Ok((
			Box::new(random_walk::RandomWalkRouting),
			Box::new(random_walk::RandomWalkRobot),
		)),
		other => Err(Error::UnknownAlgorithm(other.to_string())),
	}
}
