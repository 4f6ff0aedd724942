use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use xapplication::io::MemoryIo;
use xapplication::{
    AppResult, Application, ApplicationConfig, ApplicationHooks, DocExample, ExecutionContext,
    ParameterType,
};

/// Hooks whose `do_init` is a closure; the other hooks do nothing.
pub struct DeclareOnly<F> {
    declare: F,
    pub init_calls: Arc<AtomicUsize>,
}

impl<F> DeclareOnly<F>
where
    F: FnMut(&Application) -> AppResult<()> + Send,
{
    pub fn new(declare: F) -> Self {
        DeclareOnly {
            declare,
            init_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl<F> ApplicationHooks for DeclareOnly<F>
where
    F: FnMut(&Application) -> AppResult<()> + Send,
{
    fn do_init(&mut self, app: &Application) -> AppResult<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        (self.declare)(app)
    }

    fn do_update_parameters(&mut self, _app: &Application) -> AppResult<()> {
        Ok(())
    }

    fn do_execute(&mut self, _app: &Application, _ctx: &mut ExecutionContext<'_>) -> AppResult<()> {
        Ok(())
    }
}

pub fn app_with(
    name: &str,
    config: ApplicationConfig,
    declare: impl FnMut(&Application) -> AppResult<()> + Send + 'static,
) -> Application {
    Application::builder(name, DeclareOnly::new(declare))
        .config(config)
        .io(Arc::new(MemoryIo::new()))
        .build()
}

/// Parameter layout of a typical resampling application.
pub fn declare_resize(app: &Application) -> AppResult<()> {
    app.add_parameter(ParameterType::InputImage, "in", "Input image")?;
    app.add_parameter(ParameterType::OutputImage, "out", "Output image")?;

    app.add_parameter(ParameterType::Choice, "mode", "Resize mode")?;
    app.add_choice("mode.fit", "Fit to size")?;
    app.add_parameter(ParameterType::Int, "mode.fit.size", "Target size")?;
    app.set_default_parameter_int("mode.fit.size", 100)?;
    app.add_choice("mode.crop", "Crop")?;
    app.add_parameter(ParameterType::Int, "mode.crop.x", "Crop origin")?;

    app.add_parameter(ParameterType::ListView, "interp", "Interpolators")?;
    app.add_choice("interp.nn", "Nearest neighbour")?;
    app.add_choice("interp.linear", "Linear")?;
    app.mandatory_off("interp")?;

    app.add_rand_parameter()?;
    app.update_doc(|doc| {
        doc.long_description = "Resample an image".into();
        doc.add_tag("Geometry");
        doc.add_tag("Geometry");
        doc.add_example(
            DocExample::new("Fit to 64 pixels")
                .with_parameter("in", "input.tif")
                .with_parameter("out", "small.tif")
                .with_parameter("mode.fit.size", "64"),
        );
    });
    Ok(())
}

pub fn resize_app() -> Application {
    app_with("Resize", ApplicationConfig::default(), declare_resize)
}

/// Application holding one optional group `opts` with an integer `opts.size`
/// and a top-level mandatory integer `radius`.
pub fn declare_sizes(app: &Application) -> AppResult<()> {
    app.add_parameter(ParameterType::Int, "radius", "Radius")?;
    app.add_parameter(ParameterType::Group, "opts", "Options")?;
    app.add_parameter(ParameterType::Int, "opts.size", "Size")?;
    Ok(())
}
