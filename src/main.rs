use std::sync::Arc;

use xapplication::io::MemoryIo;
use xapplication::pipeline::{ProcessObject, UnaryFunctor};
use xapplication::{
    AppResult, Application, ApplicationConfig, ApplicationHooks, ApplicationRegistry, DataIo,
    DataObject, ExecutionContext, ImageInfo, MutationOrigin, ParameterType,
};

/// Multiplies every sample of `in` by `factor`.
struct Scale;

impl ApplicationHooks for Scale {
    fn do_init(&mut self, app: &Application) -> AppResult<()> {
        app.add_parameter(ParameterType::InputImage, "in", "Input image")?;
        app.add_parameter(ParameterType::OutputImage, "out", "Output image")?;
        app.add_parameter(ParameterType::Float, "factor", "Scale factor")?;
        app.set_default_parameter_float("factor", 2.0)?;
        app.mandatory_off("factor")?;
        Ok(())
    }

    fn do_update_parameters(&mut self, _app: &Application) -> AppResult<()> {
        Ok(())
    }

    fn do_execute(&mut self, app: &Application, _ctx: &mut ExecutionContext<'_>) -> AppResult<()> {
        let factor = app.get_parameter_float("factor")? as f32;
        let input = app.get_parameter_image("in")?;
        let output = ProcessObject::spawn("scale", vec![input], UnaryFunctor::new(move |v| v * factor));
        if let Some(process) = output.producer() {
            app.add_process(process.clone(), "Scaling image");
        }
        app.set_parameter_output_image("out", output)
    }
}

/// Adds `offset` to every sample of `in`.
struct Offset;

impl ApplicationHooks for Offset {
    fn do_init(&mut self, app: &Application) -> AppResult<()> {
        app.add_parameter(ParameterType::InputImage, "in", "Input image")?;
        app.add_parameter(ParameterType::OutputImage, "out", "Output image")?;
        app.add_parameter(ParameterType::Float, "offset", "Offset")?;
        Ok(())
    }

    fn do_update_parameters(&mut self, app: &Application) -> AppResult<()> {
        if !app.has_value("offset")? {
            app.set_parameter_float("offset", 1.0, MutationOrigin::Application)?;
        }
        Ok(())
    }

    fn do_execute(&mut self, app: &Application, _ctx: &mut ExecutionContext<'_>) -> AppResult<()> {
        let offset = app.get_parameter_float("offset")? as f32;
        let input = app.get_parameter_image("in")?;
        let output = ProcessObject::spawn("offset", vec![input], UnaryFunctor::new(move |v| v + offset));
        app.set_parameter_output_image("out", output)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== XApplication runtime ===\n");

    if let Err(e) = run() {
        eprintln!("[ERROR] {}", e);
        std::process::exit(1);
    }
}

fn run() -> AppResult<()> {
    let io = Arc::new(MemoryIo::new());
    let mut registry = ApplicationRegistry::new(ApplicationConfig::default()).with_io(io.clone());
    registry.register("Scale", "Multiply pixel values", || Scale);
    registry.register("Offset", "Shift pixel values", || Offset);
    println!("[OK] Registered applications: {}", registry.available().join(", "));

    let scale = registry.create("Scale")?;
    let offset = registry.create("Offset")?;

    let source = DataObject::image(ImageInfo::new(2, 2, 1), vec![1.0, 2.0, 3.0, 4.0]);
    scale.set_parameter_input_image("in", source, MutationOrigin::User)?;
    offset.connect_image("in", &scale, "out")?;
    offset.set_parameter_string("out", "result.json", MutationOrigin::User)?;

    let order: Vec<String> = offset
        .execution_order()?
        .iter()
        .map(|a| a.name().to_string())
        .collect();
    println!("[OK] Execution order: {}", order.join(" -> "));

    offset.execute_and_write_output()?;

    let pixels = io.read_image("result.json")?;
    println!("[OK] Wrote result.json: {:?}", pixels);
    println!("[OK] Scale progress: {:?}", scale.progress());
    Ok(())
}
