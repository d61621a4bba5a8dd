mod interval;
mod pages;

use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;

use vdom_core::{component, Description, MemorySurface, NodeError, NodeId, Props, Surface};
use vdom_runtime_std::StdRuntime;

const DEFAULT_SECONDS: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Page {
    Counter,
    Sections,
}

impl Page {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "counter" => Some(Page::Counter),
            "sections" => Some(Page::Sections),
            _ => None,
        }
    }

    fn description(self) -> Description {
        match self {
            Page::Counter => Description::named("CounterPage", pages::counter_page),
            Page::Sections => Description::named("SectionsPage", pages::sections_page),
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let page = match args.next().as_deref().map(Page::parse) {
        None => Page::Counter,
        Some(Some(page)) => page,
        Some(None) => return usage(),
    };
    let seconds = match args.next().map(|arg| arg.parse::<u32>()) {
        None => DEFAULT_SECONDS,
        Some(Ok(seconds)) => seconds,
        Some(Err(_)) => return usage(),
    };

    match run(page, seconds) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn usage() -> ExitCode {
    eprintln!("usage: counter-demo [counter|sections] [seconds]");
    ExitCode::from(2)
}

fn run(page: Page, seconds: u32) -> Result<(), NodeError> {
    println!("=== vdom {page:?} demo ===");

    let surface = Rc::new(RefCell::new(MemorySurface::new()));
    let app = surface.borrow_mut().create_element("div");
    let runtime = StdRuntime::new(surface.clone());
    runtime.mount(component(page.description(), Props::new(), (), ()), app)?;
    print_frame(&surface, app, 0)?;

    for second in 1..=seconds {
        let fired = interval::advance_to(second);
        log::debug!("second {second}: {fired} interval(s) fired");
        if page == Page::Sections {
            click_script(&surface, app, second)?;
        }
        if runtime.run_until_idle()? > 0 {
            print_frame(&surface, app, second)?;
        }
    }
    Ok(())
}

/// Scripted user input for the sections page.
fn click_script(
    surface: &Rc<RefCell<MemorySurface>>,
    app: NodeId,
    second: u32,
) -> Result<(), NodeError> {
    let buttons = surface.borrow().find_by_tag(app, "button")?;
    let target = match second {
        3 => buttons.first(),
        4 | 5 => buttons.last(),
        _ => None,
    };
    if let Some(&button) = target {
        let handled = MemorySurface::dispatch(surface, button, "click")?;
        println!("click on node {button} ({handled} handler(s))");
    }
    Ok(())
}

fn print_frame(
    surface: &Rc<RefCell<MemorySurface>>,
    app: NodeId,
    second: u32,
) -> Result<(), NodeError> {
    let html = surface.borrow().to_html(app)?;
    println!("[t={second}s] {html}");
    Ok(())
}
