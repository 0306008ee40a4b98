use crate::scheduler::TimeoutScheduler;
use chain_reaction_core as game;
use game::{Cell, Coord, Coord2, GameConfig, GameError, GameState, GameStatus, Tier};
use yew::prelude::*;

fn config_for(tier: Tier, instant: bool) -> GameConfig {
    let config = tier.config();
    if instant {
        config.with_generation_delay(0)
    } else {
        config
    }
}

const fn cell_label(cell: Cell) -> &'static str {
    match cell {
        Cell::Safe => "",
        Cell::Armed => "💣",
        Cell::Exploded => "💥",
    }
}

fn cell_class(cell: Cell, placeable: bool) -> Classes {
    let mut class = classes!(
        "cell",
        match cell {
            Cell::Safe => classes!(),
            Cell::Armed => classes!("armed"),
            Cell::Exploded => classes!("exploded"),
        }
    );
    if !placeable {
        class.push("locked");
    }
    class
}

/// Text under the board: the terminal verdict, a rejected click, or a hint.
fn status_line(state: &GameState, notice: Option<GameError>) -> Option<String> {
    if let Some(message) = state.status.message() {
        return Some(message.to_string());
    }
    if let Some(notice) = notice {
        return Some(notice.to_string());
    }
    (state.bombs_remaining == 0).then(|| "Place all bombs to clear board!".to_string())
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    PlaceBomb(Coord2),
    Generation(game::WaveTicket),
    StateChanged,
    Reset(Tier),
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    row: Coord,
    col: Coord,
    cell: Cell,
    #[prop_or_default]
    placeable: bool,
    callback: Callback<Coord2>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        row,
        col,
        cell,
        placeable,
        callback,
    } = props.clone();

    let class = cell_class(cell, placeable);
    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("({}, {}) clicked", row, col);
        callback.emit((row, col));
    });

    html! {
        <td {class} {onclick}>{cell_label(cell)}</td>
    }
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    pub tier: Tier,
    pub instant: bool,
}

pub(crate) struct GameView {
    session: game::Session<TimeoutScheduler>,
    tier: Tier,
    instant: bool,
    notice: Option<GameError>,
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let GameProps { tier, instant } = ctx.props().clone();
        let scheduler = TimeoutScheduler::new(ctx.link().callback(Msg::Generation));
        let mut session = game::Session::new(config_for(tier, instant), scheduler);

        let link = ctx.link().clone();
        session.subscribe(move |_| link.send_message(Msg::StateChanged));

        Self {
            session,
            tier,
            instant,
            notice: None,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            PlaceBomb(coords) => match self.session.place_bomb(coords) {
                Ok(progress) => {
                    log::debug!("bomb at {:?}: {:?}", coords, progress);
                    self.notice.take().is_some()
                }
                Err(err) => {
                    log::debug!("bomb at {:?} rejected: {}", coords, err);
                    self.notice.replace(err) != Some(err)
                }
            },
            Generation(ticket) => {
                let progress = self.session.on_timer(ticket);
                log::trace!("timer {:?}: {:?}", ticket, progress);
                false
            }
            StateChanged => true,
            Reset(tier) => {
                self.tier = tier;
                self.notice = None;
                self.session.reset(config_for(tier, self.instant));
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let state = self.session.current();
        let size = state.size();
        let in_flight = self.session.is_wave_in_flight();
        let status_class = match state.status {
            GameStatus::InProgress if in_flight => "exploding",
            GameStatus::InProgress => "in-progress",
            GameStatus::Won => "win",
            GameStatus::Lost => "lose",
        };
        let message = status_line(&state, self.notice);

        html! {
            <div class="chain-reaction">
                <h1>{"Chain Reaction Puzzle"}</h1>
                <nav>
                    {
                        for Tier::ALL.into_iter().map(|tier| {
                            let onclick = ctx
                                .link()
                                .callback(move |_: MouseEvent| Msg::Reset(tier));
                            let class = classes!((tier == self.tier).then_some("selected"));
                            html! { <button {class} {onclick}>{tier.name()}</button> }
                        })
                    }
                </nav>
                <aside>
                    <span>{format!("Bombs left: {}", state.bombs_remaining)}</span>
                    <span>{format!("Score: {}", state.score)}</span>
                </aside>
                <table class={classes!(status_class)}>
                    {
                        for (0..size).map(|row| html! {
                            <tr>
                                {
                                    for (0..size).map(|col| {
                                        let coords = (row, col);
                                        let cell = state.cell_at(coords);
                                        let placeable = self.session.can_place_at(coords);
                                        let callback = ctx.link().callback(Msg::PlaceBomb);
                                        html! {
                                            <CellView {row} {col} {cell} {placeable} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                if let Some(message) = message {
                    <p>{message}</p>
                }
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_cell_state() {
        assert_eq!(cell_label(Cell::Safe), "");
        assert_eq!(cell_label(Cell::Armed), "💣");
        assert_eq!(cell_label(Cell::Exploded), "💥");
    }

    #[test]
    fn unplaceable_cells_are_locked() {
        assert_eq!(cell_class(Cell::Safe, true), classes!("cell"));
        assert_eq!(
            cell_class(Cell::Exploded, false),
            classes!("cell", "exploded", "locked")
        );
    }

    #[test]
    fn verdict_wins_over_notice() {
        let mut state = GameState::new(2, 0);
        state.status = GameStatus::Won;

        assert_eq!(
            status_line(&state, Some(GameError::NoBombsLeft)).as_deref(),
            Some("You cleared the board! You win!")
        );
    }

    #[test]
    fn notice_then_hint() {
        let state = GameState::new(2, 0);
        assert_eq!(
            status_line(&state, Some(GameError::CellNotSafe)).as_deref(),
            Some("Cell already armed or exploded!")
        );
        assert_eq!(
            status_line(&state, None).as_deref(),
            Some("Place all bombs to clear board!")
        );
        assert_eq!(status_line(&GameState::new(2, 1), None), None);
    }

    #[test]
    fn instant_mode_drops_generation_delay() {
        assert_eq!(config_for(Tier::Easy, true).generation_delay_ms, 0);
        assert_eq!(config_for(Tier::Easy, false).generation_delay_ms, 400);
    }
}
