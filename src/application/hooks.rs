use rand::rngs::StdRng;

use crate::error::AppResult;

use super::app::Application;

/// Random source handed to [`ApplicationHooks::do_execute`], reseeded at the
/// start of every execution.
pub struct ExecutionContext<'a> {
    rng: &'a mut StdRng,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn new(rng: &'a mut StdRng) -> Self {
        ExecutionContext { rng }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        self.rng
    }
}

/// Behaviour supplied by a concrete application.
///
/// Hooks receive the [`Application`] handle and drive it through the generic
/// parameter API. Lifecycle operations (`update_parameters`, `execute`,
/// `write_output`, `free_resources`) called on the same application from a
/// hook fail with [`ApplicationError::InvalidState`](crate::ApplicationError::InvalidState).
pub trait ApplicationHooks: Send {
    /// Declare parameters and documentation.
    fn do_init(&mut self, app: &Application) -> AppResult<()>;

    /// Fill derived or default values for parameters the caller did not set.
    fn do_update_parameters(&mut self, app: &Application) -> AppResult<()>;

    /// Build the processing pipeline and publish outputs.
    fn do_execute(&mut self, app: &Application, ctx: &mut ExecutionContext<'_>) -> AppResult<()>;

    fn after_execute_and_write_outputs(&mut self, _app: &Application) -> AppResult<()> {
        Ok(())
    }

    /// Free resources that do not live in the pipeline.
    fn do_free_resources(&mut self, _app: &Application) {}
}
