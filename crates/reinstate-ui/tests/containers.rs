use std::cell::{Cell, RefCell};
use std::rc::Rc;

use reinstate_core::{
    ChildHandle, Completion, ContainerError, Diagnostics, EffectParams, Notice, TabItem,
    TransitionEffect,
};
use reinstate_navigation::{NavigationEquatable, NavigationSurface, PopPolicy};
use reinstate_ui::{
    ManualClock, Rect, Screen, Size, StatefulNavigation, StatefulTabs, StatefulView, TimedRunner,
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
    List,
    Detail(u32),
    Settings,
}

impl NavigationEquatable for Route {
    fn can_pop_to(old: &Self, new: &Self) -> bool {
        matches!((old, new), (Route::Detail(_), Route::Detail(_))) || old == new
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Tab {
    Feed,
    Search,
    Profile,
}

struct Rig {
    clock: ManualClock,
    runner: Rc<TimedRunner>,
    built: Rc<RefCell<Vec<Screen>>>,
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl Rig {
    fn new() -> Self {
        let clock = ManualClock::new();
        let runner = Rc::new(TimedRunner::new(Rc::new(clock.clone())));
        Self {
            clock,
            runner,
            built: Rc::default(),
            notices: Rc::default(),
        }
    }

    fn factory<S: std::fmt::Debug + 'static>(&self) -> impl Fn(&S) -> Screen + 'static {
        let built = self.built.clone();
        move |s: &S| {
            let screen = Screen::new(format!("{s:?}"));
            built.borrow_mut().push(screen.clone());
            screen
        }
    }

    fn diagnostics(&self) -> Diagnostics {
        let notices = self.notices.clone();
        Diagnostics::with_sink(move |n| notices.borrow_mut().push(n.clone()))
    }

    fn advance(&self, ms: u64) -> bool {
        self.clock.advance(Duration::from_millis(ms));
        self.runner.tick()
    }

    fn screen(&self, title: &str) -> Screen {
        self.built
            .borrow()
            .iter()
            .find(|s| s.title() == title)
            .cloned()
            .unwrap_or_else(|| panic!("no screen titled {title}"))
    }

    /// Lifecycle of every screen built so far, in build order.
    fn trace(&self) -> String {
        self.built
            .borrow()
            .iter()
            .map(|s| format!("{}: {:?}", s.title(), s.events()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn flag() -> (Rc<Cell<u32>>, Completion) {
    let calls = Rc::new(Cell::new(0));
    let c = {
        let calls = calls.clone();
        Completion::new(move || calls.set(calls.get() + 1))
    };
    (calls, c)
}

#[test]
fn view_cross_fades_between_states() {
    let rig = Rig::new();
    let view = StatefulView::new(
        Flow::Splash,
        Size::new(320.0, 480.0),
        rig.runner.clone(),
        rig.factory(),
    );
    view.load();

    let (calls, done) = flag();
    view.transition(Flow::Onboarding, true, done);

    // Incoming child is on top while the fade runs; the old one is still hosted.
    let visible: Vec<_> = view.region().visible().iter().map(|s| s.title().to_owned()).collect();
    assert_eq!(visible, ["Splash", "Onboarding"]);
    assert_eq!(view.state(), Flow::Splash);
    assert_eq!(calls.get(), 0);

    assert!(!rig.advance(200));
    assert_eq!(view.state(), Flow::Onboarding);
    assert_eq!(calls.get(), 1);
    assert_eq!(view.region().children().len(), 1);

    let current = view.current_child().unwrap();
    assert_eq!(
        view.region().frame_of(&current),
        Some(Rect::from_size(Size::new(320.0, 480.0)))
    );

    insta::assert_snapshot!(rig.trace(), @r"
    Splash: [WillAttach, DidAttach, WillDetach, DidDetach]
    Onboarding: [WillAttach, DidAttach]
    ");
}

#[test]
fn remove_then_appear_runs_two_effects_back_to_back() {
    let rig = Rig::new();
    let view = StatefulView::new(
        Flow::Splash,
        Size::new(100.0, 100.0),
        rig.runner.clone(),
        rig.factory(),
    )
    .with_effect_policy(|_, _| {
        Some(TransitionEffect::RemoveThenAppear {
            on_remove: Some(EffectParams::fast()),
            on_appear: Some(EffectParams::fast()),
        })
    });
    view.load();

    view.transition(Flow::Home, true, Completion::noop());
    assert!(view.region().visible().is_empty());
    assert_eq!(rig.runner.in_flight(), 1);

    assert!(rig.advance(150));
    assert_eq!(view.region().children().len(), 1);
    assert_eq!(view.state(), Flow::Splash);

    assert!(!rig.advance(150));
    assert_eq!(view.state(), Flow::Home);

    insta::assert_snapshot!(rig.trace(), @r"
    Splash: [WillAttach, DidAttach, WillDetach, DidDetach]
    Home: [WillAttach, DidAttach]
    ");
}

#[test]
fn unanimated_transition_settles_without_ticks() {
    let rig = Rig::new();
    let view = StatefulView::new(
        Flow::Splash,
        Size::new(100.0, 100.0),
        rig.runner.clone(),
        rig.factory(),
    );
    view.load();

    let (calls, done) = flag();
    view.transition(Flow::Home, false, done);
    assert_eq!(view.state(), Flow::Home);
    assert_eq!(calls.get(), 1);
    assert_eq!(rig.runner.in_flight(), 0);
    assert!(!rig.screen("Splash").is_attached());
}

#[test]
fn view_ignores_same_state_and_reports_it() {
    let rig = Rig::new();
    let view = StatefulView::new(
        Flow::Home,
        Size::new(100.0, 100.0),
        rig.runner.clone(),
        rig.factory(),
    )
    .with_diagnostics(rig.diagnostics());
    view.load();

    let (calls, done) = flag();
    view.transition(Flow::Home, true, done);
    assert_eq!(calls.get(), 0);
    assert_eq!(rig.built.borrow().len(), 1);
    assert_eq!(
        *rig.notices.borrow(),
        vec![Notice::SameStateIgnored {
            container: "SingleSlotEngine",
            state: "Home".into(),
        }]
    );
}

#[test]
fn view_transition_before_load_configures() {
    let rig = Rig::new();
    let view = StatefulView::new(
        Flow::Splash,
        Size::new(100.0, 100.0),
        rig.runner.clone(),
        rig.factory(),
    )
    .with_diagnostics(rig.diagnostics());

    let (calls, done) = flag();
    view.transition(Flow::Onboarding, true, done);
    assert!(view.is_configured());
    assert_eq!(view.state(), Flow::Onboarding);
    assert_eq!(calls.get(), 1);
    assert_eq!(rig.trace(), "Onboarding: [WillAttach, DidAttach]");
}

#[test]
fn navigation_pops_back_to_an_existing_state() {
    let rig = Rig::new();
    let nav = StatefulNavigation::new(Route::List, rig.runner.clone(), rig.factory());
    nav.load();

    nav.transition(Route::Detail(1), false, Completion::noop());
    nav.transition(Route::Settings, false, Completion::noop());
    assert_eq!(nav.states(), [Route::List, Route::Detail(1), Route::Settings]);

    let (calls, done) = flag();
    nav.transition(Route::List, false, done);
    assert_eq!(nav.states(), [Route::List]);
    assert_eq!(nav.host().top().unwrap().title(), "List");
    assert_eq!(calls.get(), 1);

    insta::assert_snapshot!(rig.trace(), @r"
    List: [WillAttach, DidAttach]
    Detail(1): [WillAttach, DidAttach, WillDetach, DidDetach]
    Settings: [WillAttach, DidAttach, WillDetach, DidDetach]
    List: []
    ");
}

#[test]
fn navigation_without_popping_pushes_again() {
    let rig = Rig::new();
    let nav = StatefulNavigation::new(Route::List, rig.runner.clone(), rig.factory());
    nav.load();

    nav.transition_with(Route::List, false, false, Completion::noop());
    assert_eq!(nav.states(), [Route::List, Route::List]);
    assert_eq!(nav.frames().len(), nav.host().children().len());
}

#[test]
fn animated_push_commits_on_the_settling_tick() {
    let rig = Rig::new();
    let nav = StatefulNavigation::new(Route::List, rig.runner.clone(), rig.factory());
    nav.load();

    let (calls, done) = flag();
    nav.transition(Route::Detail(4), true, done);
    assert_eq!(nav.state(), Route::List);
    assert_eq!(nav.host().children().len(), 2);

    assert!(rig.advance(100));
    assert_eq!(calls.get(), 0);
    assert!(!rig.advance(50));
    assert_eq!(nav.state(), Route::Detail(4));
    assert_eq!(calls.get(), 1);
}

#[test]
fn family_states_replace_and_pop() {
    let rig = Rig::new();
    let nav = StatefulNavigation::new(Route::List, rig.runner.clone(), rig.factory())
        .with_pop_policy(PopPolicy::navigation_equatable());
    nav.load();

    nav.transition(Route::Detail(1), false, Completion::noop());
    nav.transition(Route::Settings, false, Completion::noop());
    nav.transition(Route::Detail(2), false, Completion::noop());

    assert_eq!(nav.states(), [Route::List, Route::Detail(2)]);
    let top = nav.current_child().unwrap();
    assert!(top.is_same(&rig.screen("Detail(2)")));
    assert!(!rig.screen("Detail(1)").is_attached());
    assert!(!rig.screen("Settings").is_attached());
}

#[test]
fn back_gesture_resyncs_state() {
    let rig = Rig::new();
    let nav = StatefulNavigation::new(Route::List, rig.runner.clone(), rig.factory())
        .with_diagnostics(rig.diagnostics());
    nav.load();
    nav.transition(Route::Detail(1), false, Completion::noop());
    nav.transition(Route::Settings, false, Completion::noop());
    assert!(rig.notices.borrow().is_empty());

    assert!(nav.handle_back(true));
    assert_eq!(nav.state(), Route::Settings);
    assert!(!rig.advance(150));
    assert_eq!(nav.state(), Route::Detail(1));
    assert_eq!(nav.states(), [Route::List, Route::Detail(1)]);
    assert_eq!(
        *rig.notices.borrow(),
        vec![Notice::ExternalPop { depth: 2 }]
    );

    assert!(nav.handle_back(false));
    assert!(!nav.handle_back(false));
    assert_eq!(nav.states(), [Route::List]);
}

#[test]
fn back_gesture_while_a_push_animates_wins() {
    let rig = Rig::new();
    let nav = StatefulNavigation::new(Route::List, rig.runner.clone(), rig.factory());
    nav.load();
    nav.transition(Route::Detail(1), false, Completion::noop());

    let (calls, done) = flag();
    nav.transition(Route::Settings, true, done);
    assert!(nav.handle_back(false));

    assert!(!rig.advance(150));
    assert_eq!(calls.get(), 1);
    assert_eq!(nav.states(), [Route::List, Route::Detail(1)]);
    assert_eq!(nav.state(), Route::Detail(1));
    assert_eq!(nav.frames().len(), nav.host().depth());
    assert!(nav.host().top().unwrap().is_same(&rig.screen("Detail(1)")));
}

#[test]
fn tabs_follow_state_and_taps() {
    let rig = Rig::new();
    let make = rig.factory::<Tab>();
    let items = [Tab::Feed, Tab::Search, Tab::Profile]
        .into_iter()
        .map(|t| {
            let child = make(&t);
            TabItem::new(t, child)
        })
        .collect();
    let tabs = StatefulTabs::new(items, &Tab::Search).unwrap();
    tabs.load();
    assert_eq!(tabs.host().selected_child().unwrap().title(), "Search");

    tabs.transition(&Tab::Profile);
    assert_eq!(tabs.state(), Tab::Profile);
    assert_eq!(tabs.host().selected_child().unwrap().title(), "Profile");

    assert!(tabs.tap(0));
    assert_eq!(tabs.state(), Tab::Feed);
    assert_eq!(tabs.current_item().child.title(), "Feed");

    // Switching tabs never detaches a child.
    assert!(rig.built.borrow().iter().all(Screen::is_attached));
    assert_eq!(rig.built.borrow().len(), 3);
}

#[test]
fn tabs_reject_unknown_states() {
    let items = vec![TabItem::new(Tab::Feed, Screen::new("Feed"))];
    assert!(matches!(
        StatefulTabs::new(items.clone(), &Tab::Profile),
        Err(ContainerError::InitialStateNotRegistered(_))
    ));
    assert!(matches!(
        StatefulTabs::<Tab, Screen>::new(Vec::new(), &Tab::Feed),
        Err(ContainerError::EmptyTabSet)
    ));

    let tabs = StatefulTabs::new(items, &Tab::Feed).unwrap();
    tabs.load();
    assert_eq!(
        tabs.try_transition(&Tab::Search),
        Err(ContainerError::UnregisteredState("Search".into()))
    );
    assert_eq!(tabs.state(), Tab::Feed);
}
