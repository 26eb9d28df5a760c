use std::rc::Rc;

use reinstate_core::{Completion, TabItem};
use reinstate_ui::{
    NavTransition, Screen, Size, StatefulNavigation, StatefulTabs, StatefulView, SystemClock,
    TimedRunner,
};
use web_time::Duration;

#[derive(Clone, Debug, PartialEq)]
enum Flow {
    Splash,
    Onboarding,
    Home,
}

#[derive(Clone, Debug, PartialEq)]
enum Route {
    Inbox,
    Thread(u32),
}

#[derive(Clone, Debug, PartialEq)]
enum Tab {
    Inbox,
    Settings,
}

fn screen<S: std::fmt::Debug>(state: &S) -> Screen {
    Screen::new(format!("{state:?}"))
}

/// Tick the runner at roughly 60fps until nothing is animating.
fn settle(runner: &TimedRunner) {
    while runner.tick() {
        std::thread::sleep(Duration::from_millis(16));
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let runner = Rc::new(TimedRunner::new(Rc::new(SystemClock)));

    let root = StatefulView::new(
        Flow::Splash,
        Size::new(390.0, 844.0),
        runner.clone(),
        screen::<Flow>,
    );
    root.load();
    for next in [Flow::Onboarding, Flow::Home] {
        root.transition(
            next,
            true,
            Completion::new(|| log::info!("flow step finished")),
        );
        settle(&runner);
        log::info!(
            "root shows {:?} at {:?}",
            root.state(),
            root.current_child().and_then(|c| root.region().frame_of(&c))
        );
    }

    let nav = StatefulNavigation::new(Route::Inbox, runner.clone(), screen::<Route>)
        .with_nav_transition(NavTransition {
            slide_px: 80.0,
            ..Default::default()
        });
    nav.load();
    nav.transition(Route::Thread(7), true, Completion::noop());
    settle(&runner);
    nav.transition(Route::Thread(9), true, Completion::noop());
    settle(&runner);
    log::info!("stack: {:?}", nav.states());

    nav.handle_back(true);
    settle(&runner);
    nav.transition(Route::Inbox, true, Completion::noop());
    settle(&runner);
    log::info!("stack after going home: {:?}", nav.states());

    let tabs = StatefulTabs::new(
        vec![
            TabItem::new(Tab::Inbox, screen(&Tab::Inbox)),
            TabItem::new(Tab::Settings, screen(&Tab::Settings)),
        ],
        &Tab::Inbox,
    )?;
    tabs.load();
    tabs.try_transition(&Tab::Settings)?;
    tabs.tap(0);
    log::info!("selected tab: {:?}", tabs.state());

    Ok(())
}
