//! The fixed set of commands the shell understands and the query behind each.

use std::collections::HashMap;
use std::fmt::Write;
use std::num::NonZeroUsize;

use nom::combinator::all_consuming;

use crate::config::{Config, DEFAULT_SEASON, PLAYER_PAGE_SIZE, TEAM_PAGE_SIZE};
use crate::error::ValidationError;
use crate::lex::integer;
use crate::store::Value;

pub const SEASON: &str = "season year";
pub const MIN_SEASON: i64 = 1920;
pub const MAX_SEASON: i64 = 2100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: i64,
    pub label: &'static str,
}

pub const SEASON_TYPES: &[Choice] = &[
    Choice { value: 1, label: "Regular Season" },
    Choice { value: 2, label: "Post Season" },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// `max: None` leaves the value unbounded above.
    Integer { min: i64, max: Option<i64> },
    Text { upper: bool },
    Choice(&'static [Choice]),
}

/// Where a parameter's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    Argument,
    Prompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub source: ParamSource,
    pub prompt: &'static str,
    pub default: Option<i64>,
}

impl ParamSpec {
    pub fn text_arg(name: &'static str) -> Self {
        ParamSpec {
            name,
            kind: ParamKind::Text { upper: false },
            source: ParamSource::Argument,
            prompt: "",
            default: None,
        }
    }

    pub fn int_arg(name: &'static str, min: i64, max: i64) -> Self {
        ParamSpec {
            kind: ParamKind::Integer { min, max: Some(max) },
            ..Self::int_at_least(name, min)
        }
    }

    pub fn int_at_least(name: &'static str, min: i64) -> Self {
        ParamSpec {
            name,
            kind: ParamKind::Integer { min, max: None },
            source: ParamSource::Argument,
            prompt: "",
            default: None,
        }
    }

    pub fn season(prompt: &'static str, default: i64) -> Self {
        ParamSpec {
            name: SEASON,
            kind: ParamKind::Integer { min: MIN_SEASON, max: Some(MAX_SEASON) },
            source: ParamSource::Prompt,
            prompt,
            default: Some(default),
        }
    }

    pub fn season_type() -> Self {
        ParamSpec {
            name: "season type",
            kind: ParamKind::Choice(SEASON_TYPES),
            source: ParamSource::Prompt,
            prompt: "Enter season type",
            default: None,
        }
    }

    pub fn upper(mut self) -> Self {
        self.kind = ParamKind::Text { upper: true };
        self
    }

    pub fn or_default(mut self, default: i64) -> Self {
        self.default = Some(default);
        self
    }

    pub fn is_argument(&self) -> bool {
        self.source == ParamSource::Argument
    }

    /// Parses one raw answer or argument token into a bindable value.
    pub fn validate(&self, raw: &str) -> Result<Value, ValidationError> {
        let raw = raw.trim();
        match &self.kind {
            ParamKind::Text { upper } => {
                if raw.is_empty() {
                    Err(ValidationError::Empty { param: self.name })
                } else if *upper {
                    Ok(Value::Text(raw.to_uppercase()))
                } else {
                    Ok(Value::Text(raw.to_string()))
                }
            },
            ParamKind::Integer { .. } => {
                let n = parse_int(raw).ok_or(ValidationError::NotAnInteger { param: self.name })?;
                self.accept_int(n)
            },
            ParamKind::Choice(choices) => {
                let not_a_choice = || ValidationError::NotAChoice { options: choice_list(choices) };
                let n = parse_int(raw).ok_or_else(not_a_choice)?;
                choices.iter()
                       .find(|c| c.value == n)
                       .map(|c| Value::Int(c.value))
                       .ok_or_else(not_a_choice)
            },
        }
    }

    /// Range-checks an integer that was already parsed out of an argument.
    pub fn accept_int(&self, n: i64) -> Result<Value, ValidationError> {
        match self.kind {
            ParamKind::Integer { min, max: Some(max) } if n < min || n > max => {
                Err(ValidationError::OutOfRange { param: self.name, min, max })
            },
            ParamKind::Integer { min, max: None } if n < min => {
                Err(ValidationError::TooSmall { param: self.name, min })
            },
            ParamKind::Choice(choices) if !choices.iter().any(|c| c.value == n) => {
                Err(ValidationError::NotAChoice { options: choice_list(choices) })
            },
            _ => Ok(Value::Int(n)),
        }
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    all_consuming(integer)(raw).ok().map(|(_, n)| n)
}

fn choice_list(choices: &[Choice]) -> String {
    let values: Vec<String> = choices.iter().map(|c| c.value.to_string()).collect();
    match values.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        _ => values.join(""),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    Single(&'static str),
    /// One statement per answer of the choice parameter at `param`.
    PerChoice { param: usize, variants: &'static [(i64, &'static str)] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page_size: NonZeroUsize,
    pub noun: &'static str,
}

/// A follow-up lookup run when a lookup command comes back empty, to tell an
/// unknown identifier apart from a period with no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistenceCheck {
    pub sql: &'static str,
    pub param: usize,
    pub entity: &'static str,
    pub subject: &'static str,
    pub data: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub description: &'static str,
    pub hint: Option<&'static str>,
    pub params: Vec<ParamSpec>,
    pub template: Template,
    pub default_season_year: Option<i64>,
    pub paging: Option<Paging>,
    pub existence: Option<ExistenceCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    pub sql: &'static str,
    pub params: Vec<Value>,
}

impl QueryDescriptor {
    fn new(name: &'static str, usage: &'static str, description: &'static str, sql: &'static str) -> Self {
        QueryDescriptor {
            name,
            aliases: &[],
            usage,
            description,
            hint: None,
            params: Vec::new(),
            template: Template::Single(sql),
            default_season_year: None,
            paging: None,
            existence: None,
        }
    }

    fn alias(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    fn season(mut self, prompt: &'static str, default: i64) -> Self {
        self.default_season_year = Some(default);
        self.param(ParamSpec::season(prompt, default))
    }

    fn per_choice(mut self, param: usize, variants: &'static [(i64, &'static str)]) -> Self {
        self.template = Template::PerChoice { param, variants };
        self
    }

    fn paged(mut self, page_size: NonZeroUsize, noun: &'static str) -> Self {
        self.paging = Some(Paging { page_size, noun });
        self
    }

    fn check(mut self, check: ExistenceCheck) -> Self {
        self.existence = Some(check);
        self
    }

    pub fn arguments(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| p.is_argument())
    }

    pub fn prompts(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| !p.is_argument())
    }

    pub fn short_form(&self) -> String {
        format!("[{}]", self.aliases.first().unwrap_or(&self.name).to_uppercase())
    }

    /// Picks the statement for `values` (given in declared parameter order)
    /// and pairs it with them for placeholder binding.
    pub fn bind(&self, values: Vec<Value>) -> Result<BoundQuery, ValidationError> {
        if values.len() != self.params.len() {
            return Err(ValidationError::Arity { expected: self.params.len(), got: values.len() });
        }

        let sql = match &self.template {
            Template::Single(sql) => *sql,
            Template::PerChoice { param, variants } => {
                let chosen = values.get(*param).and_then(Value::as_int);
                variants.iter()
                        .find(|(v, _)| Some(*v) == chosen)
                        .map(|(_, sql)| *sql)
                        .ok_or_else(|| ValidationError::NotAChoice {
                            options: variants.iter()
                                             .map(|(v, _)| v.to_string())
                                             .collect::<Vec<_>>()
                                             .join(", "),
                        })?
            },
        };

        Ok(BoundQuery { sql, params: values })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOptions {
    pub default_season: i64,
    pub player_page_size: NonZeroUsize,
    pub team_page_size: NonZeroUsize,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        CatalogOptions {
            default_season: DEFAULT_SEASON,
            player_page_size: PLAYER_PAGE_SIZE,
            team_page_size: TEAM_PAGE_SIZE,
        }
    }
}

impl From<&Config> for CatalogOptions {
    fn from(config: &Config) -> Self {
        CatalogOptions {
            default_season: config.default_season,
            player_page_size: config.player_page_size,
            team_page_size: config.team_page_size,
        }
    }
}

#[derive(Debug)]
pub struct Catalog {
    entries: Vec<QueryDescriptor>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(options: &CatalogOptions) -> Self {
        let entries = descriptors(options);
        let mut index = HashMap::new();
        for (i, d) in entries.iter().enumerate() {
            for verb in std::iter::once(&d.name).chain(d.aliases.iter()) {
                index.insert(verb.to_lowercase(), i);
            }
        }
        Catalog { entries, index }
    }

    pub fn lookup(&self, verb: &str) -> Option<&QueryDescriptor> {
        self.index.get(&verb.to_lowercase()).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryDescriptor> {
        self.entries.iter()
    }

    pub fn help(&self) -> String {
        let mut out = String::new();
        let rule = "-".repeat(110);

        let _ = writeln!(out, "\nNFL Database Command Reference (Type 'q' to quit)");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "| {:32} | {:12} | {}", "COMMAND (and Arguments)", "SHORT FORM", "DESCRIPTION");
        let _ = writeln!(out, "{}", rule);
        for d in &self.entries {
            let _ = writeln!(out, "| {:32} | {:12} | {}", d.usage, d.short_form(), d.description);
        }
        let _ = writeln!(out, "| {:32} | {:12} | {}", "h | help", "[H]", "Display this help screen.");
        let _ = writeln!(out, "| {:32} | {:12} | {}", "q | quit", "[Q]", "Exit the program.");
        let _ = writeln!(out, "{}", rule);
        out
    }
}

const TOP_REGULAR: &str = "SELECT t.team_name, ts.points_scored \
     FROM reg_team_stat ts JOIN team t ON t.team_abbr = ts.team \
     WHERE ts.season = ?3 \
     ORDER BY ts.points_scored DESC \
     LIMIT ?1";

const TOP_POST: &str = "SELECT t.team_name, ts.points_scored \
     FROM post_team_stat ts JOIN team t ON t.team_abbr = ts.team \
     WHERE ts.season = ?3 \
     ORDER BY ts.points_scored DESC \
     LIMIT ?1";

fn descriptors(o: &CatalogOptions) -> Vec<QueryDescriptor> {
    let season = o.default_season;

    vec![
        QueryDescriptor::new(
            "all_players", "all_players",
            "See all players and their IDs (paged).",
            "SELECT player_id, display_name FROM player ORDER BY display_name"
        )
            .alias(&["all_plys"])
            .paged(o.player_page_size, "players"),

        QueryDescriptor::new(
            "all_teams", "all_teams",
            "See all teams, abbreviations, and divisions (paged).",
            "SELECT team_abbr, team_name, team_division FROM team ORDER BY team_name"
        )
            .alias(&["all_tms"])
            .paged(o.team_page_size, "teams"),

        QueryDescriptor::new(
            "win", "win",
            "Find the Super Bowl winning team in a given season (prompts for year).",
            "SELECT t.team_name, p.season \
             FROM post_team_stat p JOIN team t ON p.team = t.team_abbr \
             WHERE p.finish = 'champ.win' AND p.season = ?1"
        )
            .season("Enter Season Year for Super Bowl winner", season),

        QueryDescriptor::new(
            "tds", "tds <player id>",
            "Get player postseason touchdown score (prompts for year).",
            "SELECT p.display_name, \
             (pps.passing_tds + pps.receiving_tds + pps.rushing_tds + pps.special_teams_tds) AS touchdowns \
             FROM player p JOIN post_player_stat pps ON p.player_id = pps.player_id \
             WHERE p.player_id = ?1 AND pps.season = ?2"
        )
            .hint("Use 'all_players' to see IDs.")
            .param(ParamSpec::text_arg("player id"))
            .season("Enter Season Year", season)
            .check(ExistenceCheck {
                sql: "SELECT display_name FROM player WHERE player_id = ?1",
                param: 0,
                entity: "Player ID",
                subject: "Player",
                data: "Post Season touchdown statistics",
            }),

        QueryDescriptor::new(
            "ypc", "ypc <player name>",
            "Get the regular season yards per carry of a specific player (prompts for year).",
            "SELECT p.display_name, \
             ROUND(CAST(rps.rushing_yards + rps.receiving_yards + rps.passing_yards AS REAL) \
             / NULLIF(rps.carries, 0), 2) AS ypc \
             FROM player p JOIN reg_player_stat rps ON p.player_id = rps.player_id \
             WHERE p.display_name = ?1 AND rps.season = ?2"
        )
            .param(ParamSpec::text_arg("player name"))
            .season("Enter Season Year (Regular Season)", season)
            .check(ExistenceCheck {
                sql: "SELECT display_name FROM player WHERE display_name = ?1 LIMIT 1",
                param: 0,
                entity: "Player name",
                subject: "Player",
                data: "Regular Season rushing statistics",
            }),

        QueryDescriptor::new(
            "score", "score <team name>",
            "Get team total score in the postseason (prompts for year).",
            "SELECT t.team_name, pts.points_scored \
             FROM post_team_stat pts JOIN team t ON pts.team = t.team_abbr \
             WHERE t.team_name = ?1 AND pts.season = ?2"
        )
            .hint("Use 'all_teams' to see names.")
            .param(ParamSpec::text_arg("team name"))
            .season("Enter Season Year (Post Season)", season)
            .check(ExistenceCheck {
                sql: "SELECT team_name FROM team WHERE team_name = ?1",
                param: 0,
                entity: "Team name",
                subject: "Team",
                data: "Post Season scoring statistics",
            }),

        QueryDescriptor::new(
            "win_pct", "win_pct <team name>",
            "Regular season win percentage of a given team (prompts for year).",
            "SELECT t.team_abbr, \
             ROUND(CAST(rts.wins AS REAL) / NULLIF(rts.wins + rts.losses, 0), 3) AS win_pct \
             FROM team t JOIN reg_team_stat rts ON t.team_abbr = rts.team \
             WHERE t.team_name = ?1 AND rts.season = ?2"
        )
            .hint("Use 'all_teams' to see names.")
            .param(ParamSpec::text_arg("team name"))
            .season("Enter Season Year for Win Percentage", season)
            .check(ExistenceCheck {
                sql: "SELECT team_name FROM team WHERE team_name = ?1",
                param: 0,
                entity: "Team name",
                subject: "Team",
                data: "Regular Season record",
            }),

        QueryDescriptor::new(
            "host", "host <stadium name>",
            "Number of games hosted by a specific stadium in the postseason (prompts for year).",
            "SELECT COUNT(g.game_id) AS games_hosted \
             FROM game g JOIN played_in pi ON g.game_id = pi.game_id \
             JOIN stadium s ON pi.stadium_id = s.stadium_id \
             WHERE g.game_type = 'post' AND s.stadium = ?1 AND g.season = ?2"
        )
            .param(ParamSpec::text_arg("stadium name"))
            .season("Enter Season Year", season),

        QueryDescriptor::new(
            "ref_penalties", "ref_penalties <team abbr>",
            "Get team penalties and their most frequent referee (prompts for year).",
            "WITH ref_officiated AS ( \
                 SELECT r.official_id, r.official_name, COUNT(g.game_id) AS games_officiated \
                 FROM refree r JOIN official o ON r.official_id = o.official_id \
                 JOIN game g ON o.game_id = g.game_id \
                 WHERE (g.home_team = ?1 OR g.away_team = ?1) AND g.season = ?2 \
                 GROUP BY r.official_id, r.official_name \
             ), target_ref AS ( \
                 SELECT official_name, games_officiated AS max_games \
                 FROM ref_officiated \
                 WHERE games_officiated = (SELECT MAX(games_officiated) FROM ref_officiated) \
             ) \
             SELECT t.team_abbr, rts.penalties, tr.official_name, tr.max_games \
             FROM reg_team_stat rts JOIN team t ON rts.team = t.team_abbr \
             CROSS JOIN target_ref tr \
             WHERE t.team_abbr = ?1 AND rts.season = ?2"
        )
            .alias(&["ref_pen"])
            .hint("Use 'all_teams' to see abbreviations.")
            .param(ParamSpec::text_arg("team abbreviation").upper())
            .season("Enter Season Year for Penalty Stats", season)
            .check(ExistenceCheck {
                sql: "SELECT team_name FROM team WHERE team_abbr = ?1",
                param: 0,
                entity: "Team abbreviation",
                subject: "Team",
                data: "Regular Season penalty statistics",
            }),

        QueryDescriptor::new(
            "top", "top <no of teams>",
            "Get top N teams in points scored (default 3, prompts for season type and year).",
            TOP_REGULAR
        )
            .param(ParamSpec::int_at_least("number of teams", 1).or_default(3))
            .param(ParamSpec::season_type())
            .season("Enter Season Year", season)
            .per_choice(1, &[(1, TOP_REGULAR), (2, TOP_POST)]),

        QueryDescriptor::new(
            "tdl", "tdl",
            "Get touchdown leaders at every jersey number (prompts for year).",
            "WITH max_tds_per_jersey AS ( \
                 SELECT p.jersey_number, MAX(rps.passing_tds + rps.rushing_tds + rps.receiving_tds) AS max_tds \
                 FROM reg_player_stat rps JOIN player p ON rps.player_id = p.player_id \
                 WHERE p.jersey_number IS NOT NULL AND rps.season = ?1 \
                 GROUP BY p.jersey_number \
             ) \
             SELECT p.display_name, mtd.jersey_number, mtd.max_tds AS touchdowns \
             FROM max_tds_per_jersey mtd \
             JOIN player p ON mtd.jersey_number = p.jersey_number \
             JOIN reg_player_stat rps ON p.player_id = rps.player_id \
             WHERE mtd.max_tds = (rps.passing_tds + rps.rushing_tds + rps.receiving_tds) \
             AND rps.season = ?1 \
             ORDER BY mtd.jersey_number"
        )
            .season("Enter Season Year for Touchdown Leaders", season),

        QueryDescriptor::new(
            "top5_post_tds", "top5_post_tds",
            "Get the top 5 players in total touchdowns scored in the post-season (prompts for year).",
            "SELECT p.display_name, \
             (pps.passing_tds + pps.receiving_tds + pps.rushing_tds + pps.special_teams_tds) AS touchdowns \
             FROM player p JOIN post_player_stat pps ON p.player_id = pps.player_id \
             WHERE pps.season = ?1 \
             ORDER BY touchdowns DESC \
             LIMIT 5"
        )
            .alias(&["top5_tds"])
            .season("Enter Season Year for Postseason TDs", season),

        QueryDescriptor::new(
            "def_tds", "def_tds",
            "Which defensive players had a touchdown in the regular season (prompts for year).",
            "SELECT p.display_name, p.position, \
             (rps.passing_tds + rps.receiving_tds + rps.rushing_tds + rps.special_teams_tds) AS defensive_tds \
             FROM player p JOIN reg_player_stat rps ON p.player_id = rps.player_id \
             WHERE p.position IN ('CB', 'S', 'LB', 'DE', 'DT') \
             AND rps.season = ?1 \
             AND (rps.passing_tds + rps.receiving_tds + rps.rushing_tds + rps.special_teams_tds) > 0"
        )
            .season("Enter Season Year for Player Stats", season),

        QueryDescriptor::new(
            "defensive_trifecta", "defensive_trifecta",
            "Players who recorded a sack, fumble, and interception in the regular season (prompts for year).",
            "SELECT p.display_name, p.position \
             FROM player p JOIN reg_player_stat rps ON p.player_id = rps.player_id \
             WHERE rps.sacks >= 1 AND rps.sack_fumbles >= 1 AND rps.interceptions >= 1 \
             AND rps.season = ?1"
        )
            .alias(&["dft"])
            .season("Enter Season Year for Stats", season),

        QueryDescriptor::new(
            "low_targets", "low_targets",
            "Players with more targets than receptions in the regular season (prompts for year).",
            "SELECT p.display_name, rps.targets, rps.receptions \
             FROM player p JOIN reg_player_stat rps ON p.player_id = rps.player_id \
             WHERE rps.targets > rps.receptions AND rps.season = ?1"
        )
            .alias(&["low_trgts"])
            .season("Enter Season Year for Player Stats", season),

        QueryDescriptor::new(
            "team_top_scorer", "team_top_scorer",
            "Get the #1 scoring player on each team in the regular season (prompts for year).",
            "WITH player_points AS ( \
                 SELECT rps.player_id, p.display_name, \
                 ((rps.receiving_tds + rps.passing_tds + rps.rushing_tds + rps.special_teams_tds) * 6) \
                 + ((rps.rushing_2pt_conversions + rps.receiving_2pt_conversions \
                 + rps.passing_2pt_conversions) * 2) AS player_points \
                 FROM reg_player_stat rps JOIN player p ON rps.player_id = p.player_id \
                 WHERE rps.season = ?1 \
             ), max_output AS ( \
                 SELECT r.team, MAX(pp.player_points) AS max_points \
                 FROM roaster r JOIN player_points pp ON r.player_id = pp.player_id \
                 GROUP BY r.team \
             ) \
             SELECT r.team, pp.display_name, mo.max_points \
             FROM roaster r JOIN player_points pp ON r.player_id = pp.player_id \
             JOIN max_output mo ON r.team = mo.team AND pp.player_points = mo.max_points \
             ORDER BY r.team"
        )
            .alias(&["top_scorer"])
            .season("Enter Season Year for Top Scorers", season),

        QueryDescriptor::new(
            "tdp", "tdp <week no.>",
            "Get total regular season point differential of all games in a specific week (prompts for year).",
            "SELECT SUM(home_score - away_score) AS total_point_differential \
             FROM game \
             WHERE week = ?1 AND game_type = 'reg' AND season = ?2"
        )
            .param(ParamSpec::int_arg("week number", 1, 22))
            .season("Enter Season Year for point differential", season),

        QueryDescriptor::new(
            "week_scores", "week_scores",
            "Each regular season week's max and min points scored in a game (prompts for year).",
            "WITH game_scores AS ( \
                 SELECT week, home_score AS score FROM game WHERE game_type = 'reg' AND season = ?1 \
                 UNION ALL \
                 SELECT week, away_score AS score FROM game WHERE game_type = 'reg' AND season = ?1 \
             ) \
             SELECT gs.week, MAX(gs.score) AS max_score, MIN(gs.score) AS min_score \
             FROM game_scores gs GROUP BY gs.week ORDER BY gs.week"
        )
            .alias(&["wk_score"])
            .season("Enter Season Year for Week Scores", season),

        QueryDescriptor::new(
            "shutouts", "shutouts",
            "Teams shut out (scored zero) in a game, with the week it happened (prompts for year).",
            "SELECT t.team_abbr, g.week, g.season \
             FROM team t \
             JOIN game g ON (t.team_abbr = g.home_team AND g.home_score = 0) \
             OR (t.team_abbr = g.away_team AND g.away_score = 0) \
             WHERE g.season = ?1 \
             ORDER BY g.week, t.team_abbr"
        )
            .season("Enter Season Year for Shutouts", season),

        QueryDescriptor::new(
            "ref_away_win", "ref_away_win",
            "Referee who officiated the most games where the away team won (prompts for year).",
            "SELECT r.official_name, COUNT(o.game_id) AS games_officiated_away_win \
             FROM refree r JOIN official o ON r.official_id = o.official_id \
             JOIN game g ON o.game_id = g.game_id \
             WHERE g.away_score > g.home_score AND g.season = ?1 \
             GROUP BY r.official_name \
             ORDER BY games_officiated_away_win DESC \
             LIMIT 1"
        )
            .alias(&["ref_win"])
            .season("Enter Season Year for Referee Stats", season),

        QueryDescriptor::new(
            "plyr_yds", "plyr_yds <max yds> <division>",
            "Players on a top 2 division team with total yards < max yards (prompts for year).",
            "SELECT p.display_name, \
             (rps.receiving_yards + rps.passing_yards + rps.rushing_yards) AS total_yds \
             FROM reg_player_stat rps \
             JOIN player p ON rps.player_id = p.player_id \
             JOIN roaster rstr ON p.player_id = rstr.player_id \
             JOIN team t ON rstr.team = t.team_abbr \
             JOIN reg_team_stat rts ON t.team_abbr = rts.team \
             WHERE rts.division_rank IN (1, 2) \
             AND t.team_division = ?2 \
             AND rts.season = ?3 \
             AND (rps.receiving_yards + rps.passing_yards + rps.rushing_yards) < ?1 \
             ORDER BY total_yds DESC"
        )
            .param(ParamSpec::int_arg("max yards", 0, 100_000))
            .param(ParamSpec::text_arg("division"))
            .season("Enter Season Year for player stats", season),

        QueryDescriptor::new(
            "top_half_low_div", "top_half_low_div",
            "Teams in the top half of the league in points but bottom half of their division (prompts for year).",
            "SELECT t.team_name \
             FROM reg_team_stat rts JOIN team t ON rts.team = t.team_abbr \
             WHERE rts.season = ?1 \
             AND rts.points_scored > (SELECT AVG(points_scored) FROM reg_team_stat WHERE season = ?1) \
             AND rts.division_rank IN (3, 4)"
        )
            .alias(&["hld"])
            .season("Enter Season Year", season),
    ]
}

#[cfg(test)]
mod test {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(&CatalogOptions::default())
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_alias_transparent() {
        let c = catalog();
        let win = c.lookup("win").unwrap();
        assert_eq!(c.lookup("WIN"), Some(win));
        assert_eq!(c.lookup("Win"), Some(win));

        let hld = c.lookup("top_half_low_div").unwrap();
        assert_eq!(c.lookup("HLD"), Some(hld));
        assert_eq!(c.lookup("ref_pen").unwrap().name, "ref_penalties");
        assert_eq!(c.lookup("DFT").unwrap().name, "defensive_trifecta");
        assert!(c.lookup("nope").is_none());
        assert!(c.lookup("h").is_none());
    }

    #[test]
    fn test_verbs_are_unique() {
        let c = catalog();
        let verbs: usize = c.iter().map(|d| 1 + d.aliases.len()).sum();
        assert_eq!(verbs, c.index.len());
    }

    #[test]
    fn test_paged_listings() {
        let c = catalog();
        let paged: Vec<&str> = c.iter().filter(|d| d.paging.is_some()).map(|d| d.name).collect();
        assert_eq!(paged, vec!["all_players", "all_teams"]);
        assert_eq!(c.lookup("all_players").unwrap().paging.unwrap().page_size.get(), 20);
        assert_eq!(c.lookup("all_teams").unwrap().paging.unwrap().page_size.get(), 10);
    }

    #[test]
    fn test_options_flow_into_descriptors() {
        let c = Catalog::new(&CatalogOptions {
            default_season: 2022,
            player_page_size: NonZeroUsize::new(7).unwrap(),
            team_page_size: NonZeroUsize::new(4).unwrap(),
        });
        let win = c.lookup("win").unwrap();
        assert_eq!(win.default_season_year, Some(2022));
        assert_eq!(win.params[0].default, Some(2022));
        assert_eq!(c.lookup("all_plys").unwrap().paging.unwrap().page_size.get(), 7);
    }

    #[test]
    fn test_validate() {
        let season = ParamSpec::season("Enter Season Year", 2023);
        assert_eq!(season.validate(" 2022 "), Ok(Value::Int(2022)));
        assert_eq!(season.validate("twenty"), Err(ValidationError::NotAnInteger { param: SEASON }));
        assert_eq!(
            season.validate("3023"),
            Err(ValidationError::OutOfRange { param: SEASON, min: MIN_SEASON, max: MAX_SEASON })
        );

        let kind = ParamSpec::season_type();
        assert_eq!(kind.validate("2"), Ok(Value::Int(2)));
        assert_eq!(kind.validate("3"), Err(ValidationError::NotAChoice { options: "1 or 2".to_string() }));
        assert!(kind.validate("x").is_err());

        let teams = ParamSpec::int_at_least("number of teams", 1);
        assert_eq!(teams.validate("33"), Ok(Value::Int(33)));
        assert_eq!(teams.validate("1000"), Ok(Value::Int(1000)));
        assert_eq!(teams.validate("0"), Err(ValidationError::TooSmall { param: "number of teams", min: 1 }));

        let abbr = ParamSpec::text_arg("team abbreviation").upper();
        assert_eq!(abbr.validate("kc"), Ok(Value::Text("KC".to_string())));
        assert_eq!(abbr.validate("  "), Err(ValidationError::Empty { param: "team abbreviation" }));
    }

    #[test]
    fn test_bind_selects_template_by_season_type() {
        let c = catalog();
        let top = c.lookup("top").unwrap();

        let q = top.bind(vec![Value::Int(3), Value::Int(1), Value::Int(2023)]).unwrap();
        assert!(q.sql.contains("reg_team_stat"));
        assert!(q.sql.contains("points_scored"));
        assert_eq!(q.params, vec![Value::Int(3), Value::Int(1), Value::Int(2023)]);

        let q = top.bind(vec![Value::Int(5), Value::Int(2), Value::Int(2023)]).unwrap();
        assert!(q.sql.contains("post_team_stat"));

        assert!(top.bind(vec![Value::Int(5), Value::Int(9), Value::Int(2023)]).is_err());
        assert_eq!(
            top.bind(vec![Value::Int(3)]),
            Err(ValidationError::Arity { expected: 3, got: 1 })
        );
    }

    #[test]
    fn test_text_params_are_placeholders() {
        for d in catalog().iter() {
            let sqls: Vec<&str> = match &d.template {
                Template::Single(sql) => vec![*sql],
                Template::PerChoice { variants, .. } => variants.iter().map(|(_, s)| *s).collect(),
            };
            for sql in sqls {
                let highest = (1..=d.params.len())
                    .rev()
                    .find(|i| sql.contains(&format!("?{}", i)));
                assert_eq!(highest, if d.params.is_empty() { None } else { Some(d.params.len()) },
                    "{} must reference its last parameter", d.name);
                assert!(!sql.contains("{}"));
            }
        }
    }

    #[test]
    fn test_help_lists_every_command() {
        let c = catalog();
        let help = c.help();
        for d in c.iter() {
            assert!(help.contains(d.usage), "{} missing from help", d.name);
        }
        assert!(help.contains("[REF_PEN]"));
        assert!(help.contains("h | help"));
    }
}
