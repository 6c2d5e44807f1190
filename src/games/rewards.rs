use crate::progress::ProgressMap;
use crate::term::{self, Rgb, TerminalGuard, paint};
use crossterm::event::KeyCode;
use std::collections::BTreeSet;
use std::io;
use tracing::debug;

pub struct Challenge
{
    pub title: &'static str,
    pub description: &'static str,
    pub reward: u32,
}

pub const DAILY: Challenge = Challenge {
    title: "Daily Challenge",
    description: "Score 50 points in any game today!",
    reward: 10,
};

pub const WEEKLY: Challenge = Challenge {
    title: "Weekly Challenge",
    description: "Earn 3 new badges this week!",
    reward: 50,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopItem
{
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u32,
}

pub const SHOP: &[ShopItem] = &[
    ShopItem {
        id: "avatar1",
        name: "Cool Cat Avatar",
        cost: 30,
    },
    ShopItem {
        id: "avatar2",
        name: "Super Star Avatar",
        cost: 50,
    },
    ShopItem {
        id: "theme1",
        name: "Rainbow Theme",
        cost: 40,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purchase
{
    Bought,
    AlreadyOwned,
    NotEnoughPoints,
}

/// Points to spend while the rewards screen is open. Nothing here is saved.
#[derive(Debug, Clone, Default)]
pub struct Wallet
{
    points: u32,
    owned: BTreeSet<&'static str>,
    claimed_daily: bool,
    claimed_weekly: bool,
}

impl Wallet
{
    pub fn new(progress: &ProgressMap) -> Self
    {
        Self {
            points: progress.total_score(),
            ..Self::default()
        }
    }

    pub fn points(&self) -> u32
    {
        self.points
    }

    pub fn owns(&self, item: &ShopItem) -> bool
    {
        self.owned.contains(item.id)
    }

    pub fn claimed_daily(&self) -> bool
    {
        self.claimed_daily
    }

    pub fn claimed_weekly(&self) -> bool
    {
        self.claimed_weekly
    }

    /// `false` when already claimed.
    pub fn claim_daily(&mut self) -> bool
    {
        if self.claimed_daily {
            return false;
        }
        self.claimed_daily = true;
        self.points += DAILY.reward;
        true
    }

    pub fn claim_weekly(&mut self) -> bool
    {
        if self.claimed_weekly {
            return false;
        }
        self.claimed_weekly = true;
        self.points += WEEKLY.reward;
        true
    }

    pub fn buy(&mut self, item: &ShopItem) -> Purchase
    {
        if self.owns(item) {
            return Purchase::AlreadyOwned;
        }
        if self.points < item.cost {
            return Purchase::NotEnoughPoints;
        }
        self.points -= item.cost;
        self.owned.insert(item.id);
        Purchase::Bought
    }
}

pub fn run(term: &mut TerminalGuard, progress: &ProgressMap) -> io::Result<()>
{
    let mut wallet = Wallet::new(progress);
    let mut message = String::new();
    loop {
        term.draw(&shop_lines(&wallet, &message))?;
        let key = term::read_key()?;
        if term::is_back(&key) {
            return Ok(());
        }
        message = match key.code {
            KeyCode::Char('d') => {
                if wallet.claim_daily() {
                    format!("+{} points!", DAILY.reward)
                } else {
                    "Already claimed.".to_string()
                }
            }
            KeyCode::Char('w') => {
                if wallet.claim_weekly() {
                    format!("+{} points!", WEEKLY.reward)
                } else {
                    "Already claimed.".to_string()
                }
            }
            _ => match term::option_index(&key).and_then(|idx| SHOP.get(idx)) {
                Some(item) => {
                    let result = wallet.buy(item);
                    debug!(item = item.id, ?result, points = wallet.points(), "Shop purchase");
                    match result {
                        Purchase::Bought => format!("You got the {}!", item.name),
                        Purchase::AlreadyOwned => format!("You already own the {}.", item.name),
                        Purchase::NotEnoughPoints => {
                            "Not enough points yet. Keep playing!".to_string()
                        }
                    }
                }
                None => continue,
            },
        };
    }
}

fn shop_lines(wallet: &Wallet, message: &str) -> Vec<String>
{
    let claim = |claimed: bool, reward: u32| {
        if claimed {
            "Claimed".to_string()
        } else {
            format!("Claim +{reward} points")
        }
    };

    let mut lines = vec![
        "Rewards & Shop".to_string(),
        String::new(),
        paint(&format!("Points: {}", wallet.points()), Rgb::GOLD),
        String::new(),
        format!("{}: {}", DAILY.title, DAILY.description),
        format!("  d. {}", claim(wallet.claimed_daily(), DAILY.reward)),
        format!("{}: {}", WEEKLY.title, WEEKLY.description),
        format!("  w. {}", claim(wallet.claimed_weekly(), WEEKLY.reward)),
        String::new(),
        "Shop:".to_string(),
    ];
    for (idx, item) in SHOP.iter().enumerate() {
        let status = if wallet.owns(item) {
            paint("Owned", Rgb::GREEN)
        } else if wallet.points() < item.cost {
            paint(&format!("{} points", item.cost), Rgb::GREY)
        } else {
            format!("{} points", item.cost)
        };
        lines.push(format!("  {}. {}  {}", idx + 1, item.name, status));
    }
    lines.push(String::new());
    lines.push(message.to_string());
    lines.push("ESC to go back.".to_string());
    lines
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::progress::ScoredRecord;

    fn progress_with(typing: u32, math: u32) -> ProgressMap
    {
        let mut progress = ProgressMap::default();
        progress.typing = ScoredRecord {
            score: typing,
            ..ScoredRecord::default()
        };
        progress.math = ScoredRecord {
            score: math,
            ..ScoredRecord::default()
        };
        progress
    }

    #[test]
    fn wallet_starts_at_total_score()
    {
        let wallet = Wallet::new(&progress_with(20, 15));
        assert_eq!(wallet.points(), 35);
    }

    #[test]
    fn claims_are_one_shot()
    {
        let mut wallet = Wallet::new(&ProgressMap::default());
        assert!(wallet.claim_daily());
        assert!(!wallet.claim_daily());
        assert!(wallet.claim_weekly());
        assert!(!wallet.claim_weekly());
        assert_eq!(wallet.points(), 60);
    }

    #[test]
    fn items_are_bought_once_while_points_allow()
    {
        let mut wallet = Wallet::new(&progress_with(40, 0));
        let star = &SHOP[1];
        let cat = &SHOP[0];
        assert_eq!(wallet.buy(star), Purchase::NotEnoughPoints);
        assert_eq!(wallet.buy(cat), Purchase::Bought);
        assert_eq!(wallet.points(), 10);
        assert_eq!(wallet.buy(cat), Purchase::AlreadyOwned);
        assert_eq!(wallet.points(), 10);
    }
}
