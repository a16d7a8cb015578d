use crate::domain::{PlayerAtTable, SeatIndex, Table};

/// Может ли игрок получить ход.
///
/// `pre_hand` – режим до раздачи карт (перенос кнопки, блайнды):
/// наличие карманных карт не требуется.
fn can_take_turn(player: &PlayerAtTable, pre_hand: bool) -> bool {
    if pre_hand {
        player.can_be_dealt_in() && !player.folded
    } else {
        player.is_active(true) && player.has_cards()
    }
}

/// Найти следующее активное место по кругу, начиная со следующего за `from`.
///
/// Пропускает пустые места, сфолдивших, не участвующих в игре, игроков без
/// фишек и (вне `pre_hand`) игроков без карт. Место `stop_at` (агрессор раунда)
/// возвращается сразу, даже если игрок уже не может ходить: так раунд
/// закрывается на нём. Ограничено одним кругом по столу.
pub fn find_next_active_position(
    table: &Table,
    from: SeatIndex,
    pre_hand: bool,
    stop_at: Option<SeatIndex>,
) -> Option<SeatIndex> {
    let max = table.max_seats() as usize;
    if max == 0 {
        return None;
    }

    let mut idx = from as usize % max;
    for _ in 0..max {
        idx = (idx + 1) % max;
        let seat = idx as SeatIndex;

        if stop_at == Some(seat) {
            return Some(seat);
        }
        if let Some(p) = table.player(seat) {
            if can_take_turn(p, pre_hand) {
                return Some(seat);
            }
        }
    }

    None
}

/// Первое место, которое может получить карты, начиная с места 0.
pub fn first_dealable_seat(table: &Table) -> Option<SeatIndex> {
    let last = table.max_seats().checked_sub(1)?;
    find_next_active_position(table, last, true, None)
}

/// Места игроков, которые получают карты в новой раздаче, по кругу от `start` (не включая).
pub fn collect_dealable_seats_after(table: &Table, start: SeatIndex) -> Vec<SeatIndex> {
    let max = table.max_seats() as usize;
    let mut seats = Vec::new();
    for step in 1..=max {
        let seat = ((start as usize + step) % max) as SeatIndex;
        if table.player(seat).is_some_and(|p| can_take_turn(p, true)) {
            seats.push(seat);
        }
    }
    seats
}

/// Игроки в раздаче: с картами, не сфолдили, в игре.
pub fn live_seats(table: &Table) -> Vec<SeatIndex> {
    table
        .occupied_seats()
        .filter(|(_, p)| p.is_active(false) && p.has_cards())
        .map(|(seat, _)| seat)
        .collect()
}

/// Сколько игроков ещё могут делать ставки (в раздаче и с фишками).
pub fn count_bettors(table: &Table) -> usize {
    table
        .occupied_seats()
        .filter(|(_, p)| can_take_turn(p, false))
        .count()
}

/// Сколько игроков может получить карты в новой раздаче.
pub fn count_dealable(table: &Table) -> usize {
    table
        .occupied_seats()
        .filter(|(_, p)| p.can_be_dealt_in())
        .count()
}
